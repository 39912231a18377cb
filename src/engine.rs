use crate::neuron::NeuronDescriptor;
use crate::types::NeuronId;

/// Execution engine that owns neuron state and advances it in time.
///
/// Construction calls arrive in the order a [`crate::network::Network`] was
/// built, so the ids returned by `add_neuron` are expected to be 0, 1, 2, ...
/// Each `input_*` call advances every neuron by exactly one timestep.
pub trait NetworkEngine {
    fn set_amplitude(&mut self, amplitude: f64);

    fn add_neuron(&mut self, neuron: &NeuronDescriptor) -> NeuronId;

    fn connect(&mut self, source: NeuronId, target: NeuronId, weight: Option<f64>);

    /// Connection that only transmits once the engine enables it.
    fn connect_enable(&mut self, source: NeuronId, target: NeuronId);

    fn add_layer(&mut self, neuron_ids: &[NeuronId], is_output: bool, is_dynamic: bool);

    fn input_spike(&mut self, spike: bool);

    fn input_potential(&mut self, potential: f64);
}

pub fn input_by_spike<E: NetworkEngine + ?Sized>(engine: &mut E, spike: bool) {
    engine.input_spike(spike);
}

pub fn input_by_potential<E: NetworkEngine + ?Sized>(engine: &mut E, potential: f64) {
    engine.input_potential(potential);
}
