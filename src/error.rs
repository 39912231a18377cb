use std::path::PathBuf;

use simple_error::SimpleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResonatorError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(SimpleError),

    #[error("invalid calibration data at {path}: {reason}")]
    Configuration { path: PathBuf, reason: String },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("numeric range exceeded: {0}")]
    NumericRange(String),
}

impl ResonatorError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        ResonatorError::InvalidParameter(SimpleError::new(msg))
    }
}

pub type Result<T> = std::result::Result<T, ResonatorError>;
