use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{ResonatorError, Result};
use crate::neuron::LeakagePeriod;
use crate::util::relative_error;

pub const MAX_LEAKAGE_FACTOR: u32 = 9;

/// Exclusive upper bound of the leakage period grid.
pub const LEAKAGE_PERIOD_LIMIT: u32 = 400;

pub const RELATIVE_TOLERANCE: f64 = 0.05;

/// A point on the (LF, LP) search grid. LP is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecayParams {
    pub leakage_factor: u32,
    pub leakage_period: u32,
}

impl DecayParams {
    pub fn leakage_period(&self) -> LeakagePeriod {
        LeakagePeriod::Finite(self.leakage_period)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LfLpOption {
    pub decay: DecayParams,
    pub frequency: f64,
    pub relative_error: f64,
}

/// Analytic resonant frequency of a resonator with decay parameters (LF, LP).
pub fn resonator_frequency(pulse_clock: f64, leakage_factor: u32, leakage_period: u32) -> f64 {
    pulse_clock / (2f64.powi(leakage_factor as i32) * 2.0 * PI * (1.0 + leakage_period as f64))
}

fn validate_search_inputs(target_frequency: f64, pulse_clock: f64) -> Result<()> {
    if !(target_frequency > 0.0) || !target_frequency.is_finite() {
        return Err(ResonatorError::invalid_parameter(format!(
            "target frequency must be finite and strictly positive, got {}",
            target_frequency
        )));
    }

    if !(pulse_clock > 0.0) || !pulse_clock.is_finite() {
        return Err(ResonatorError::invalid_parameter(format!(
            "pulse clock must be finite and strictly positive, got {}",
            pulse_clock
        )));
    }

    Ok(())
}

/// Best leakage period for every leakage factor, in ascending LF order.
pub fn lf_lp_options(target_frequency: f64, pulse_clock: f64) -> Result<Vec<LfLpOption>> {
    validate_search_inputs(target_frequency, pulse_clock)?;

    let options = (0..=MAX_LEAKAGE_FACTOR)
        .map(|leakage_factor| {
            let mut best_period = 1;
            let mut best_distance = f64::INFINITY;

            for leakage_period in 1..LEAKAGE_PERIOD_LIMIT {
                let distance = (resonator_frequency(pulse_clock, leakage_factor, leakage_period)
                    - target_frequency)
                    .abs();

                if distance < best_distance {
                    best_distance = distance;
                    best_period = leakage_period;
                }
            }

            let frequency = resonator_frequency(pulse_clock, leakage_factor, best_period);

            LfLpOption {
                decay: DecayParams {
                    leakage_factor,
                    leakage_period: best_period,
                },
                frequency,
                relative_error: relative_error(target_frequency, frequency),
            }
        })
        .collect();

    Ok(options)
}

/// Picks the largest LF within tolerance, falling back to the smallest relative error.
/// LF 0 to 2 are part of the search, so high targets can resolve below LF 3.
pub fn suggest_lf_lp(target_frequency: f64, pulse_clock: f64) -> Result<DecayParams> {
    let options = lf_lp_options(target_frequency, pulse_clock)?;

    if let Some(option) = options
        .iter()
        .rev()
        .find(|option| option.relative_error < RELATIVE_TOLERANCE)
    {
        return Ok(option.decay);
    }

    let mut best = &options[0];

    for option in &options[1..] {
        if option.relative_error < best.relative_error {
            best = option;
        }
    }

    Ok(best.decay)
}
