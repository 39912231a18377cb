use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::engine::{self, NetworkEngine};
use crate::error::{ResonatorError, Result};
use crate::params::{self, SweepParams};

/// Position within a swept-sine stimulus. Carrying it from one batch (or one
/// call) to the next continues the stimulus without a phase jump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepCursor {
    pub phase: f64,
    pub base_frequency: f64,
    pub sample_offset: u64,
}

impl SweepCursor {
    pub fn new(start_frequency: f64) -> Self {
        Self {
            phase: 0.0,
            base_frequency: start_frequency,
            sample_offset: 0,
        }
    }

    /// Start frequency of the next batch.
    pub fn frequency(&self, frequency_step: f64) -> f64 {
        self.base_frequency + self.sample_offset as f64 * frequency_step
    }
}

/// Appends `size` chirp samples to `samples` and advances `cursor`.
///
/// The phase increment of sample `i` (counted from the start of the sweep) is
/// `(i * step + start + step) * 2pi / clock`; the phase is the running sum of
/// the increments seeded with the carried phase.
pub fn create_sine_wave(
    samples: &mut Vec<f64>,
    size: usize,
    pulse_clock: f64,
    frequency_step: f64,
    cursor: &mut SweepCursor,
) {
    samples.reserve(size);

    for i in 0..size as u64 {
        let index = (cursor.sample_offset + i) as f64;
        let increment =
            (index * frequency_step + cursor.base_frequency + frequency_step) * 2.0 * PI
                / pulse_clock;
        cursor.phase += increment;
        samples.push(cursor.phase.sin());
    }

    cursor.sample_offset += size as u64;
}

/// Drives a swept-sine stimulus into an engine in bounded-memory batches.
pub struct Sweep {
    params: SweepParams,
    cursor: SweepCursor,
    buffer: Vec<f64>,
}

impl Sweep {
    pub fn new(params: SweepParams) -> Result<Self> {
        let cursor = SweepCursor::new(params.start_frequency);
        Self::resume(params, cursor)
    }

    /// Continues a sweep from the cursor a previous run ended with.
    pub fn resume(params: SweepParams, cursor: SweepCursor) -> Result<Self> {
        params::validate_sweep_params(&params).map_err(ResonatorError::InvalidParameter)?;

        Ok(Self {
            buffer: Vec::with_capacity(params.batch_size),
            params,
            cursor,
        })
    }

    pub fn cursor(&self) -> SweepCursor {
        self.cursor
    }

    /// Feeds the next `num_samples` samples, one timestep each, in order.
    pub fn run<E: NetworkEngine + ?Sized>(&mut self, engine: &mut E, num_samples: usize) {
        let mut remaining = num_samples;

        while remaining > 0 {
            let batch_size = remaining.min(self.params.batch_size);

            self.buffer.clear();
            create_sine_wave(
                &mut self.buffer,
                batch_size,
                self.params.pulse_clock,
                self.params.frequency_step,
                &mut self.cursor,
            );

            for &sample in &self.buffer {
                engine::input_by_potential(engine, sample);
            }

            remaining -= batch_size;

            log::debug!(
                "sweep batch of {} samples done, next start frequency {:.3}, {} samples left",
                batch_size,
                self.cursor.frequency(self.params.frequency_step),
                remaining
            );
        }
    }
}

/// Runs a full sweep of `params.total_samples` samples and returns the cursor
/// it ended with.
pub fn sweep<E: NetworkEngine + ?Sized>(
    engine: &mut E,
    params: &SweepParams,
) -> Result<SweepCursor> {
    let mut sweep = Sweep::new(params.clone())?;

    log::info!(
        "sweeping {} samples from {} Hz in steps of {} Hz at {} Hz clock",
        params.total_samples,
        params.start_frequency,
        params.frequency_step,
        params.pulse_clock
    );

    sweep.run(engine, params.total_samples);

    let cursor = sweep.cursor();

    log::info!(
        "sweep finished at {:.3} Hz",
        cursor.frequency(params.frequency_step)
    );

    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_util::RecordingEngine;
    use float_cmp::assert_approx_eq;

    fn params(total_samples: usize, batch_size: usize) -> SweepParams {
        SweepParams {
            total_samples,
            start_frequency: 100.0,
            frequency_step: 0.5,
            pulse_clock: 1_536_000.0,
            batch_size,
        }
    }

    #[test]
    fn first_samples() {
        let mut samples = Vec::new();
        let mut cursor = SweepCursor::new(100.0);
        create_sine_wave(&mut samples, 2, 1_536_000.0, 0.5, &mut cursor);

        let phase_0 = 100.5 * 2.0 * PI / 1_536_000.0;
        let phase_1 = phase_0 + 101.0 * 2.0 * PI / 1_536_000.0;

        assert_approx_eq!(f64, samples[0], phase_0.sin());
        assert_approx_eq!(f64, samples[1], phase_1.sin());
        assert_approx_eq!(f64, cursor.phase, phase_1);
        assert_eq!(cursor.sample_offset, 2);
        assert_approx_eq!(f64, cursor.frequency(0.5), 101.0);
    }

    #[test]
    fn batching_is_invisible() {
        let mut single = RecordingEngine::default();
        let single_cursor = sweep(&mut single, &params(1000, 1000)).unwrap();

        let mut batched = RecordingEngine::default();
        let batched_cursor = sweep(&mut batched, &params(1000, 64)).unwrap();

        assert_eq!(single.potentials.len(), 1000);
        assert_eq!(single.potentials, batched.potentials);
        assert_eq!(single_cursor, batched_cursor);
    }

    #[test]
    fn zero_samples() {
        let mut engine = RecordingEngine::default();
        let cursor = sweep(&mut engine, &params(0, 10)).unwrap();

        assert!(engine.potentials.is_empty());
        assert_eq!(cursor, SweepCursor::new(100.0));
    }

    #[test]
    fn invalid_params() {
        let mut engine = RecordingEngine::default();

        assert!(matches!(
            sweep(&mut engine, &params(10, 0)),
            Err(ResonatorError::InvalidParameter(_))
        ));

        let mut bad_clock = params(10, 10);
        bad_clock.pulse_clock = 0.0;
        assert!(matches!(
            sweep(&mut engine, &bad_clock),
            Err(ResonatorError::InvalidParameter(_))
        ));
        assert!(engine.potentials.is_empty());
    }
}
