use crate::calibration::CalibrationStore;
use crate::engine::NetworkEngine;
use crate::error::{ResonatorError, Result};
use crate::frequency::{self, DecayParams};
use crate::gain::{self, QuantizedGain};
use crate::network::Network;
use crate::neuron::{ActivationFunction, LeakagePeriod, NeuronDescriptor};
use crate::observer::{TuningObserver, TuningReport};
use crate::params::CalibrationRecord;
use crate::template;

pub const CUSTOM_SYNAPSE_WEIGHTS: [f64; 2] = [10.0, 30.0];
const CUSTOM_LEAKAGE_FACTOR: u32 = 1;
const CUSTOM_THETA: f64 = -1.0;

/// A tuned network template. Each variant owns exactly one network.
pub trait ResonatorVariant {
    fn freq0(&self) -> f64;

    fn network(&self) -> &Network;

    /// Hands the network to an engine. The topology is frozen afterwards.
    fn deploy(&mut self, engine: &mut dyn NetworkEngine) -> Result<()>;

    fn into_network(self) -> Network
    where
        Self: Sized;
}

fn report_tuning(
    observer: &mut dyn TuningObserver,
    freq0: f64,
    pulse_clock: f64,
    decay: DecayParams,
    scaled_gain: Option<i64>,
) {
    observer.on_tuned(&TuningReport {
        target_frequency: freq0,
        resolved_frequency: frequency::resonator_frequency(
            pulse_clock,
            decay.leakage_factor,
            decay.leakage_period,
        ),
        decay,
        scaled_gain,
    });
}

/// Resonant core with four detection lanes and a slow envelope output.
#[derive(Debug, Clone)]
pub struct Resonator {
    freq0: f64,
    decay: DecayParams,
    gain: QuantizedGain,
    network: Network,
}

impl Resonator {
    pub fn new(freq0: f64, pulse_clock: f64, observer: &mut dyn TuningObserver) -> Result<Self> {
        let decay = frequency::suggest_lf_lp(freq0, pulse_clock)?;
        Self::with_decay(freq0, pulse_clock, decay, observer)
    }

    /// Builds the template for explicitly chosen decay parameters instead of
    /// searching for them.
    pub fn with_decay(
        freq0: f64,
        pulse_clock: f64,
        decay: DecayParams,
        observer: &mut dyn TuningObserver,
    ) -> Result<Self> {
        let gain = gain::gain_factor(decay.leakage_factor, decay.leakage_period())?;

        report_tuning(observer, freq0, pulse_clock, decay, Some(gain.scaled()));

        let network = template::default_template(decay, gain.value()).build()?;

        Ok(Self {
            freq0,
            decay,
            gain,
            network,
        })
    }

    pub fn decay(&self) -> DecayParams {
        self.decay
    }

    pub fn gain(&self) -> QuantizedGain {
        self.gain
    }
}

impl ResonatorVariant for Resonator {
    fn freq0(&self) -> f64 {
        self.freq0
    }

    fn network(&self) -> &Network {
        &self.network
    }

    fn deploy(&mut self, engine: &mut dyn NetworkEngine) -> Result<()> {
        self.network.deploy(engine)
    }

    fn into_network(self) -> Network {
        self.network
    }
}

/// Resonant core whose gains come from calibration data.
#[derive(Debug, Clone)]
pub struct OptimizationResonator {
    freq0: f64,
    decay: DecayParams,
    network: Network,
}

impl OptimizationResonator {
    pub fn new(
        freq0: f64,
        pulse_clock: f64,
        record: &CalibrationRecord,
        observer: &mut dyn TuningObserver,
    ) -> Result<Self> {
        let decay = match record.fixed_decay() {
            Some(decay) => decay,
            None => frequency::suggest_lf_lp(freq0, pulse_clock)?,
        };

        report_tuning(observer, freq0, pulse_clock, decay, None);

        let network = template::optimization_template(decay, record).build()?;

        Ok(Self {
            freq0,
            decay,
            network,
        })
    }

    pub fn decay(&self) -> DecayParams {
        self.decay
    }
}

impl ResonatorVariant for OptimizationResonator {
    fn freq0(&self) -> f64 {
        self.freq0
    }

    fn network(&self) -> &Network {
        &self.network
    }

    fn deploy(&mut self, engine: &mut dyn NetworkEngine) -> Result<()> {
        self.network.deploy(engine)
    }

    fn into_network(self) -> Network {
        self.network
    }
}

/// Donor network followed by a refractory pulse-shaping output neuron.
#[derive(Debug, Clone)]
pub struct CustomResonator {
    freq0: f64,
    network: Network,
}

impl CustomResonator {
    /// Consumes `donor` and appends the pulse-shaping stage to its network.
    /// The new neuron listens to the donor's last layer and to itself.
    pub fn extend<R: ResonatorVariant>(donor: R, threshold_pulse: f64) -> Result<Self> {
        let freq0 = donor.freq0();
        let mut network = donor.into_network();

        if network.is_sealed() {
            return Err(ResonatorError::InvalidState(
                "cannot extend a network that has already been deployed".to_string(),
            ));
        }

        let input_nids = network
            .layers()
            .last()
            .map(|layer| layer.neuron_ids.clone())
            .ok_or_else(|| {
                ResonatorError::InvalidTopology("donor network has no layers".to_string())
            })?;

        let nid = network.add_neuron(NeuronDescriptor {
            synapse_weights: CUSTOM_SYNAPSE_WEIGHTS.to_vec(),
            leakage_factor: CUSTOM_LEAKAGE_FACTOR,
            leakage_period: LeakagePeriod::NoLeakage,
            theta: CUSTOM_THETA,
            threshold_pulse,
            activation_function: ActivationFunction::Binary,
            ..NeuronDescriptor::default()
        })?;

        network.add_layer(vec![nid], true, true)?;

        for source in input_nids {
            network.connect(source, nid)?;
        }

        network.connect(nid, nid)?;
        network.validate()?;

        Ok(Self { freq0, network })
    }
}

impl ResonatorVariant for CustomResonator {
    fn freq0(&self) -> f64 {
        self.freq0
    }

    fn network(&self) -> &Network {
        &self.network
    }

    fn deploy(&mut self, engine: &mut dyn NetworkEngine) -> Result<()> {
        self.network.deploy(engine)
    }

    fn into_network(self) -> Network {
        self.network
    }
}

/// Loads the calibration record for (`pulse_clock`, `freq0`), builds the
/// calibrated core and appends the pulse-shaping stage.
pub fn create_custom_resonator(
    store: &CalibrationStore,
    freq0: f64,
    pulse_clock: f64,
    observer: &mut dyn TuningObserver,
) -> Result<CustomResonator> {
    let record = store.load(pulse_clock, freq0)?;
    let resonator = OptimizationResonator::new(freq0, pulse_clock, &record, observer)?;
    CustomResonator::extend(resonator, record.threshold_pulse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use crate::util::test_util::{self, EngineCall, RecordingEngine};

    const CLOCK: f64 = 1_536_000.0;

    fn template_record() -> CalibrationRecord {
        CalibrationRecord::from_file(&test_util::get_template_calibration_file()).unwrap()
    }

    #[test]
    fn default_resonator_reports_tuning() {
        let mut reports: Vec<TuningReport> = Vec::new();
        let resonator = Resonator::new(500.0, CLOCK, &mut reports).unwrap();

        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.decay, resonator.decay());
        assert_eq!(report.scaled_gain, Some(resonator.gain().scaled()));
        assert_eq!(report.target_frequency, 500.0);
        assert!((report.resolved_frequency - 500.0).abs() / 500.0 < 0.05);
    }

    #[test]
    fn default_resonator_uses_quantized_gain() {
        let decay = DecayParams {
            leakage_factor: 3,
            leakage_period: 2,
        };
        let resonator = Resonator::with_decay(500.0, CLOCK, decay, &mut NoopObserver).unwrap();
        let gain = resonator.gain().value();

        assert_eq!(resonator.gain().scaled(), 38_933_333_333);
        assert_eq!(resonator.network().amplitude(), 1000.0 * gain);
        assert_eq!(
            resonator.network().neurons()[1].synapse_weights,
            vec![11.0 * gain, -9.0 * gain]
        );
    }

    #[test]
    fn optimization_uses_fixed_decay() {
        let record = template_record();
        let resonator = OptimizationResonator::new(500.0, CLOCK, &record, &mut NoopObserver).unwrap();

        assert_eq!(
            resonator.decay(),
            DecayParams {
                leakage_factor: 5,
                leakage_period: 72
            }
        );
        assert_eq!(resonator.network().get_num_neurons(), 5);
        assert_eq!(resonator.network().get_num_layers(), 3);
        assert!(resonator.network().has_connection(4, 1));
    }

    #[test]
    fn optimization_derives_decay() {
        let mut file = test_util::get_template_calibration_file();
        file.lf = -1;
        let record = CalibrationRecord::from_file(&file).unwrap();
        let mut reports: Vec<TuningReport> = Vec::new();

        let resonator = OptimizationResonator::new(500.0, CLOCK, &record, &mut reports).unwrap();

        assert_eq!(
            resonator.decay(),
            frequency::suggest_lf_lp(500.0, CLOCK).unwrap()
        );
        assert_eq!(reports[0].scaled_gain, None);
    }

    #[test]
    fn custom_extends_default() {
        let resonator = Resonator::new(500.0, CLOCK, &mut NoopObserver).unwrap();
        let custom = CustomResonator::extend(resonator, 14.5).unwrap();
        let network = custom.network();

        assert_eq!(network.get_num_neurons(), 19);
        assert_eq!(network.get_num_layers(), 7);
        assert!(network.has_connection(18, 18));
        assert!(network.has_connection(17, 18));
        assert_eq!(custom.freq0(), 500.0);

        let layer = network.layers().last().unwrap();
        assert_eq!(layer.neuron_ids, vec![18]);
        assert!(layer.is_output);
        assert!(layer.is_dynamic);

        let neuron = &network.neurons()[18];
        assert_eq!(neuron.synapse_weights, vec![10.0, 30.0]);
        assert_eq!(neuron.leakage_period, LeakagePeriod::NoLeakage);
        assert_eq!(neuron.activation_function, ActivationFunction::Binary);
        assert_eq!(neuron.threshold_pulse, 14.5);
    }

    #[test]
    fn deployed_donor_cannot_be_extended() {
        let mut resonator = Resonator::new(500.0, CLOCK, &mut NoopObserver).unwrap();
        let mut engine = RecordingEngine::default();
        resonator.deploy(&mut engine).unwrap();

        assert!(matches!(
            CustomResonator::extend(resonator, 14.5),
            Err(ResonatorError::InvalidState(_))
        ));
    }

    #[test]
    fn custom_deploys_output_layer() {
        let record = template_record();
        let resonator = OptimizationResonator::new(500.0, CLOCK, &record, &mut NoopObserver).unwrap();
        let mut custom = CustomResonator::extend(resonator, record.threshold_pulse).unwrap();
        let mut engine = RecordingEngine::default();

        custom.deploy(&mut engine).unwrap();

        assert_eq!(engine.neurons.len(), 6);
        assert_eq!(
            engine.calls.last(),
            Some(&EngineCall::AddLayer(vec![5], true, true))
        );
        assert!(engine.calls.contains(&EngineCall::Connect(5, 5, None)));
        assert!(engine.calls.contains(&EngineCall::Connect(4, 5, None)));
    }
}
