pub fn relative_error(target: f64, actual: f64) -> f64 {
    (target - actual).abs() / target
}

#[cfg(test)]
pub mod test_util {
    use crate::engine::NetworkEngine;
    use crate::neuron::NeuronDescriptor;
    use crate::params::CalibrationFile;
    use crate::types::NeuronId;

    #[derive(Debug, Clone, PartialEq)]
    pub enum EngineCall {
        SetAmplitude(f64),
        AddNeuron(NeuronId),
        Connect(NeuronId, NeuronId, Option<f64>),
        ConnectEnable(NeuronId, NeuronId),
        AddLayer(Vec<NeuronId>, bool, bool),
    }

    #[derive(Debug, Default)]
    pub struct RecordingEngine {
        pub calls: Vec<EngineCall>,
        pub neurons: Vec<NeuronDescriptor>,
        pub spikes: Vec<bool>,
        pub potentials: Vec<f64>,
    }

    impl NetworkEngine for RecordingEngine {
        fn set_amplitude(&mut self, amplitude: f64) {
            self.calls.push(EngineCall::SetAmplitude(amplitude));
        }

        fn add_neuron(&mut self, neuron: &NeuronDescriptor) -> NeuronId {
            self.neurons.push(neuron.clone());
            let nid = self.neurons.len() - 1;
            self.calls.push(EngineCall::AddNeuron(nid));
            nid
        }

        fn connect(&mut self, source: NeuronId, target: NeuronId, weight: Option<f64>) {
            self.calls.push(EngineCall::Connect(source, target, weight));
        }

        fn connect_enable(&mut self, source: NeuronId, target: NeuronId) {
            self.calls.push(EngineCall::ConnectEnable(source, target));
        }

        fn add_layer(&mut self, neuron_ids: &[NeuronId], is_output: bool, is_dynamic: bool) {
            self.calls
                .push(EngineCall::AddLayer(neuron_ids.to_vec(), is_output, is_dynamic));
        }

        fn input_spike(&mut self, spike: bool) {
            self.spikes.push(spike);
        }

        fn input_potential(&mut self, potential: f64) {
            self.potentials.push(potential);
        }
    }

    pub fn get_template_calibration_file() -> CalibrationFile {
        CalibrationFile {
            lf: 5,
            lp: 72,
            th_gain0: 1.0,
            th_gain1: 1.1,
            th_gain2: 0.9,
            th_gain3: 1.05,
            weight_gain0: 1.1,
            weight_gain1: 0.9,
            weight_gain2: 1.0,
            weight_gain3: 1.02,
            weight_gain4: 0.98,
            amplitude_gain: 1.0,
            th: 14.5,
        }
    }
}
