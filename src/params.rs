use serde::{Deserialize, Serialize};
use simple_error::SimpleError;

use crate::frequency::{DecayParams, LEAKAGE_PERIOD_LIMIT, MAX_LEAKAGE_FACTOR};

/// On-disk sentinel for "derive via frequency search".
pub const DERIVE_SENTINEL: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecayParam {
    Fixed(u32),
    Derive,
}

impl DecayParam {
    fn from_raw(raw: i64, name: &str) -> Result<Self, SimpleError> {
        if raw == DERIVE_SENTINEL {
            return Ok(DecayParam::Derive);
        }

        u32::try_from(raw).map(DecayParam::Fixed).map_err(|_| {
            SimpleError::new(format!(
                "{} must be {} or non-negative, got {}",
                name, DERIVE_SENTINEL, raw
            ))
        })
    }

    fn to_raw(self) -> i64 {
        match self {
            DecayParam::Fixed(value) => value as i64,
            DecayParam::Derive => DERIVE_SENTINEL,
        }
    }
}

/// Calibration file layout, one file per (clock, frequency).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationFile {
    #[serde(rename = "LF")]
    pub lf: i64,
    #[serde(rename = "LP")]
    pub lp: i64,
    pub th_gain0: f64,
    pub th_gain1: f64,
    pub th_gain2: f64,
    pub th_gain3: f64,
    pub weight_gain0: f64,
    pub weight_gain1: f64,
    pub weight_gain2: f64,
    pub weight_gain3: f64,
    pub weight_gain4: f64,
    pub amplitude_gain: f64,
    pub th: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationRecord {
    pub leakage_factor: DecayParam,
    pub leakage_period: DecayParam,
    pub theta_gains: [f64; 4],
    pub weight_gains: [f64; 5],
    pub amplitude_gain: f64,
    pub threshold_pulse: f64,
}

impl CalibrationRecord {
    pub fn from_file(file: &CalibrationFile) -> Result<Self, SimpleError> {
        let record = Self {
            leakage_factor: DecayParam::from_raw(file.lf, "LF")?,
            leakage_period: DecayParam::from_raw(file.lp, "LP")?,
            theta_gains: [file.th_gain0, file.th_gain1, file.th_gain2, file.th_gain3],
            weight_gains: [
                file.weight_gain0,
                file.weight_gain1,
                file.weight_gain2,
                file.weight_gain3,
                file.weight_gain4,
            ],
            amplitude_gain: file.amplitude_gain,
            threshold_pulse: file.th,
        };

        validate_calibration_record(&record)?;

        Ok(record)
    }

    pub fn to_file(&self) -> CalibrationFile {
        CalibrationFile {
            lf: self.leakage_factor.to_raw(),
            lp: self.leakage_period.to_raw(),
            th_gain0: self.theta_gains[0],
            th_gain1: self.theta_gains[1],
            th_gain2: self.theta_gains[2],
            th_gain3: self.theta_gains[3],
            weight_gain0: self.weight_gains[0],
            weight_gain1: self.weight_gains[1],
            weight_gain2: self.weight_gains[2],
            weight_gain3: self.weight_gains[3],
            weight_gain4: self.weight_gains[4],
            amplitude_gain: self.amplitude_gain,
            th: self.threshold_pulse,
        }
    }

    /// Decay parameters fixed by the record, if neither is left to the search.
    pub fn fixed_decay(&self) -> Option<DecayParams> {
        match (self.leakage_factor, self.leakage_period) {
            (DecayParam::Fixed(leakage_factor), DecayParam::Fixed(leakage_period)) => {
                Some(DecayParams {
                    leakage_factor,
                    leakage_period,
                })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepParams {
    pub total_samples: usize,
    pub start_frequency: f64,
    pub frequency_step: f64,
    pub pulse_clock: f64,
    pub batch_size: usize,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            total_samples: 10_000_000,
            start_frequency: 0.0,
            frequency_step: 1.0 / 200_000.0,
            pulse_clock: 1_536_000.0,
            batch_size: 50_000,
        }
    }
}

pub fn validate_calibration_record(record: &CalibrationRecord) -> Result<(), SimpleError> {
    if let DecayParam::Fixed(leakage_factor) = record.leakage_factor {
        if leakage_factor > MAX_LEAKAGE_FACTOR {
            return Err(SimpleError::new(format!(
                "LF must not be greater than {}",
                MAX_LEAKAGE_FACTOR
            )));
        }
    }

    if let DecayParam::Fixed(leakage_period) = record.leakage_period {
        if leakage_period == 0 {
            return Err(SimpleError::new("LP must not be zero"));
        }

        if leakage_period >= LEAKAGE_PERIOD_LIMIT {
            return Err(SimpleError::new(format!(
                "LP must be less than {}",
                LEAKAGE_PERIOD_LIMIT
            )));
        }
    }

    for (i, gain) in record.theta_gains.iter().enumerate() {
        if !gain.is_finite() {
            return Err(SimpleError::new(format!("th_gain{} must be finite", i)));
        }
    }

    for (i, gain) in record.weight_gains.iter().enumerate() {
        if !gain.is_finite() {
            return Err(SimpleError::new(format!("weight_gain{} must be finite", i)));
        }
    }

    if !record.amplitude_gain.is_finite() {
        return Err(SimpleError::new("amplitude_gain must be finite"));
    }

    if !record.threshold_pulse.is_finite() || record.threshold_pulse <= 0.0 {
        return Err(SimpleError::new("th must be finite and strictly positive"));
    }

    Ok(())
}

pub fn validate_sweep_params(sweep_params: &SweepParams) -> Result<(), SimpleError> {
    if !sweep_params.pulse_clock.is_finite() || sweep_params.pulse_clock <= 0.0 {
        return Err(SimpleError::new("pulse_clock must be strictly positive"));
    }

    if sweep_params.batch_size == 0 {
        return Err(SimpleError::new("batch_size must be strictly positive"));
    }

    if !sweep_params.start_frequency.is_finite() {
        return Err(SimpleError::new("start_frequency must be finite"));
    }

    if !sweep_params.frequency_step.is_finite() {
        return Err(SimpleError::new("frequency_step must be finite"));
    }

    Ok(())
}
