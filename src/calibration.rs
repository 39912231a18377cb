use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ResonatorError, Result};
use crate::params::{CalibrationFile, CalibrationRecord};

/// Directory tree of calibration files laid out as
/// `<root>/clk_<clock>/parameters/f_<frequency>.json`.
#[derive(Debug, Clone)]
pub struct CalibrationStore {
    root: PathBuf,
}

impl CalibrationStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, pulse_clock: f64, frequency: f64) -> PathBuf {
        self.root
            .join(format!("clk_{}", pulse_clock))
            .join("parameters")
            .join(format!("f_{}.json", frequency))
    }

    pub fn load(&self, pulse_clock: f64, frequency: f64) -> Result<CalibrationRecord> {
        load_calibration_record(&self.path_for(pulse_clock, frequency))
    }
}

pub fn load_calibration_record(path: &Path) -> Result<CalibrationRecord> {
    let configuration_error = |reason: String| ResonatorError::Configuration {
        path: path.to_path_buf(),
        reason,
    };

    let contents = fs::read_to_string(path).map_err(|err| configuration_error(err.to_string()))?;

    let file: CalibrationFile =
        serde_json::from_str(&contents).map_err(|err| configuration_error(err.to_string()))?;

    let record = CalibrationRecord::from_file(&file)
        .map_err(|err| configuration_error(err.as_str().to_string()))?;

    log::debug!("loaded calibration record from {}", path.display());

    Ok(record)
}
