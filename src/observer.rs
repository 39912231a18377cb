use serde::{Deserialize, Serialize};

use crate::frequency::DecayParams;

/// What a resonator was tuned to, reported once per construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningReport {
    pub target_frequency: f64,
    pub resolved_frequency: f64,
    pub decay: DecayParams,
    /// Gain factor times 1e8; absent when gains come from calibration data.
    pub scaled_gain: Option<i64>,
}

pub trait TuningObserver {
    fn on_tuned(&mut self, report: &TuningReport);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl TuningObserver for LogObserver {
    fn on_tuned(&mut self, report: &TuningReport) {
        match report.scaled_gain {
            Some(scaled_gain) => log::info!(
                "freq = {} with LF={}, LP={}, gain_factor={}/100000000",
                report.resolved_frequency as i64,
                report.decay.leakage_factor,
                report.decay.leakage_period,
                scaled_gain
            ),
            None => log::info!(
                "freq = {} with LF={}, LP={}",
                report.resolved_frequency as i64,
                report.decay.leakage_factor,
                report.decay.leakage_period
            ),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TuningObserver for NoopObserver {
    fn on_tuned(&mut self, _report: &TuningReport) {}
}

impl TuningObserver for Vec<TuningReport> {
    fn on_tuned(&mut self, report: &TuningReport) {
        self.push(report.clone());
    }
}
