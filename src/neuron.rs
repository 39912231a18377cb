use serde::{Deserialize, Serialize};

use crate::error::{ResonatorError, Result};
use crate::gain;

pub const DEFAULT_THRESHOLD_PULSE: f64 = 150_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Identity,
    Binary,
    Sigmoid,
}

/// Number of timesteps between two leakage applications. `NoLeakage` means
/// the membrane never decays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeakagePeriod {
    Finite(u32),
    NoLeakage,
}

impl LeakagePeriod {
    pub fn finite(&self) -> Option<u32> {
        match *self {
            LeakagePeriod::Finite(lp) => Some(lp),
            LeakagePeriod::NoLeakage => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronDescriptor {
    pub synapse_weights: Vec<f64>,
    pub leakage_factor: u32,
    pub leakage_period: LeakagePeriod,
    pub theta: f64,
    pub threshold_pulse: f64,
    pub activation_function: ActivationFunction,
    pub membrane_should_reset: bool,
}

impl Default for NeuronDescriptor {
    fn default() -> Self {
        Self {
            synapse_weights: Vec::new(),
            leakage_factor: 0,
            leakage_period: LeakagePeriod::NoLeakage,
            theta: 0.0,
            threshold_pulse: DEFAULT_THRESHOLD_PULSE,
            activation_function: ActivationFunction::Identity,
            membrane_should_reset: true,
        }
    }
}

impl NeuronDescriptor {
    pub fn relay() -> Self {
        Self::default()
    }

    pub fn fan_in(&self) -> usize {
        self.synapse_weights.len()
    }

    /// Checks that every weight and the bias fit the fixed-point range of the engine.
    pub fn check_numeric_range(&self) -> Result<()> {
        for weight in &self.synapse_weights {
            gain::check_fixed_point(*weight, "synapse weight")?;
        }

        gain::check_fixed_point(self.theta, "theta")?;

        if !self.threshold_pulse.is_finite() || self.threshold_pulse <= 0.0 {
            return Err(ResonatorError::NumericRange(format!(
                "threshold_pulse must be finite and strictly positive, got {}",
                self.threshold_pulse
            )));
        }

        Ok(())
    }
}
