use serde::{Deserialize, Serialize};

use crate::error::{ResonatorError, Result};
use crate::neuron::LeakagePeriod;

/// Numerator of the gain normalization.
pub const NOMINAL_INPUT_GAIN: f64 = 9344.0;

/// Gains and weights carry eight decimal places.
pub const FIXED_POINT_SCALE: i64 = 100_000_000;

pub const MAX_FIXED_POINT_MAGNITUDE: f64 = (i64::MAX / FIXED_POINT_SCALE) as f64;

/// Gain factor truncated to eight decimals, stored as its scaled integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantizedGain {
    scaled: i64,
}

impl QuantizedGain {
    /// Truncates (never rounds) `value` to eight decimals.
    pub fn quantize(value: f64) -> Result<Self> {
        let scaled = value * FIXED_POINT_SCALE as f64;

        if !scaled.is_finite() || scaled.abs() >= i64::MAX as f64 {
            return Err(ResonatorError::NumericRange(format!(
                "gain {} overflows the fixed-point representation",
                value
            )));
        }

        let scaled = scaled.trunc() as i64;

        if scaled == 0 && value != 0.0 {
            return Err(ResonatorError::NumericRange(format!(
                "gain {} underflows the fixed-point representation",
                value
            )));
        }

        Ok(Self { scaled })
    }

    pub fn scaled(&self) -> i64 {
        self.scaled
    }

    pub fn value(&self) -> f64 {
        self.scaled as f64 / FIXED_POINT_SCALE as f64
    }
}

pub fn gain_factor(leakage_factor: u32, leakage_period: LeakagePeriod) -> Result<QuantizedGain> {
    let leakage_period = leakage_period.finite().ok_or_else(|| {
        ResonatorError::invalid_parameter("gain is undefined for a neuron without leakage")
    })?;

    let exponent = i32::try_from(leakage_factor)
        .ok()
        .and_then(|lf| lf.checked_mul(2))
        .and_then(|lf| lf.checked_sub(3))
        .ok_or_else(|| {
            ResonatorError::NumericRange(format!(
                "leakage factor {} overflows the gain exponent",
                leakage_factor
            ))
        })?;
    let raw = NOMINAL_INPUT_GAIN / (2f64.powi(exponent) * (1.0 + leakage_period as f64));

    if !(raw > 0.0) {
        return Err(ResonatorError::NumericRange(format!(
            "gain for leakage factor {} underflows to zero",
            leakage_factor
        )));
    }

    QuantizedGain::quantize(raw)
}

/// Rejects values the engine would wrap or flush to zero.
pub fn check_fixed_point(value: f64, what: &str) -> Result<f64> {
    if !value.is_finite() || value.abs() > MAX_FIXED_POINT_MAGNITUDE {
        return Err(ResonatorError::NumericRange(format!(
            "{} {} exceeds the fixed-point range",
            what, value
        )));
    }

    if value != 0.0 && value.abs() * (FIXED_POINT_SCALE as f64) < 1.0 {
        return Err(ResonatorError::NumericRange(format!(
            "{} {} is below the fixed-point resolution",
            what, value
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn gain_lf_5_lp_72() {
        // 9344 / (2^7 * 73) = 1.0
        let gain = gain_factor(5, LeakagePeriod::Finite(72)).unwrap();
        assert_eq!(gain.scaled(), FIXED_POINT_SCALE);
        assert_approx_eq!(f64, gain.value(), 1.0);
    }

    #[test]
    fn truncates_instead_of_rounding() {
        // 9344 / (2^3 * 3) = 389.3333333333...
        let gain = gain_factor(3, LeakagePeriod::Finite(2)).unwrap();
        assert_eq!(gain.scaled(), 38_933_333_333);

        // 2/3 would round up in the last digit
        let gain = QuantizedGain::quantize(2.0 / 3.0).unwrap();
        assert_eq!(gain.scaled(), 66_666_666);
    }

    #[test]
    fn scaled_gain_is_integral_over_grid() {
        for lf in 0..10 {
            for lp in 1..400 {
                let gain = gain_factor(lf, LeakagePeriod::Finite(lp)).unwrap();
                let raw = NOMINAL_INPUT_GAIN / (2f64.powi(2 * lf as i32 - 3) * (1.0 + lp as f64));
                assert!(gain.scaled() > 0);
                assert!((raw - gain.value()).abs() < 2e-8);
            }
        }
    }

    #[test]
    fn no_leakage_rejected() {
        assert!(matches!(
            gain_factor(3, LeakagePeriod::NoLeakage),
            Err(ResonatorError::InvalidParameter(_))
        ));
    }

    #[test]
    fn huge_leakage_factor_underflows() {
        assert!(matches!(
            gain_factor(40, LeakagePeriod::Finite(399)),
            Err(ResonatorError::NumericRange(_))
        ));
    }

    #[test]
    fn exponent_overflow_rejected() {
        assert!(matches!(
            gain_factor(1 << 30, LeakagePeriod::Finite(1)),
            Err(ResonatorError::NumericRange(_))
        ));
        assert!(matches!(
            gain_factor(u32::MAX, LeakagePeriod::Finite(1)),
            Err(ResonatorError::NumericRange(_))
        ));
        // 2^1997 is infinite, the quotient is exactly zero
        assert!(matches!(
            gain_factor(1000, LeakagePeriod::Finite(1)),
            Err(ResonatorError::NumericRange(_))
        ));
    }

    #[test]
    fn fixed_point_bounds() {
        assert!(check_fixed_point(-10.0, "weight").is_ok());
        assert!(check_fixed_point(0.0, "weight").is_ok());
        assert!(check_fixed_point(1e-9, "weight").is_err());
        assert!(check_fixed_point(1e12, "weight").is_err());
        assert!(check_fixed_point(f64::INFINITY, "weight").is_err());
    }
}
