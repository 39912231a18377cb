//! Fixed resonator wirings expressed as tables of neurons, connections and
//! layers. Every table goes through the same structural validation when it is
//! turned into a [`Network`].

use std::ops::RangeInclusive;

use crate::error::Result;
use crate::frequency::DecayParams;
use crate::network::Network;
use crate::neuron::{ActivationFunction, LeakagePeriod, NeuronDescriptor};
use crate::params::CalibrationRecord;
use crate::types::NeuronId;

pub const AMPLITUDE_SCALE: f64 = 1000.0;

/// Ringing stages whose output feeds one detection lane each.
pub const LANE_SOURCES: [NeuronId; 4] = [8, 2, 4, 6];

const LANE_PULSE_OFFSET: NeuronId = 9;
const LANE_OUTPUT_OFFSET: NeuronId = 13;
const AGGREGATION_NID: NeuronId = 17;

const AGGREGATION_WEIGHT: f64 = 6.0;
const AGGREGATION_LEAKAGE_FACTOR: u32 = 5;
const AGGREGATION_LEAKAGE_PERIOD: u32 = 500;
const AGGREGATION_THETA: f64 = -12.0;
const AGGREGATION_THRESHOLD_PULSE: f64 = 150_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSpec {
    pub source: NeuronId,
    pub target: NeuronId,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSpec {
    pub neuron_ids: RangeInclusive<NeuronId>,
    pub is_output: bool,
    pub is_dynamic: bool,
}

#[derive(Debug, Clone)]
pub struct Template {
    pub amplitude: f64,
    pub neurons: Vec<NeuronDescriptor>,
    pub connections: Vec<ConnectionSpec>,
    pub layers: Vec<LayerSpec>,
}

impl Template {
    pub fn build(self) -> Result<Network> {
        let mut network = Network::new(self.amplitude)?;

        for neuron in self.neurons {
            network.add_neuron(neuron)?;
        }

        for conn in self.connections {
            if conn.enabled {
                network.connect(conn.source, conn.target)?;
            } else {
                network.connect_enable(conn.source, conn.target)?;
            }
        }

        for layer in self.layers {
            network.add_layer(layer.neuron_ids.collect(), layer.is_output, layer.is_dynamic)?;
        }

        network.validate()?;

        Ok(network)
    }
}

fn decaying_neuron(
    synapse_weights: Vec<f64>,
    decay: DecayParams,
    theta: f64,
    activation_function: ActivationFunction,
) -> NeuronDescriptor {
    NeuronDescriptor {
        synapse_weights,
        leakage_factor: decay.leakage_factor,
        leakage_period: decay.leakage_period(),
        theta,
        activation_function,
        ..NeuronDescriptor::default()
    }
}

fn direct(source: NeuronId, target: NeuronId) -> ConnectionSpec {
    ConnectionSpec {
        source,
        target,
        enabled: true,
    }
}

fn gated(source: NeuronId, target: NeuronId) -> ConnectionSpec {
    ConnectionSpec {
        source,
        target,
        enabled: false,
    }
}

fn hidden_layer(neuron_ids: RangeInclusive<NeuronId>) -> LayerSpec {
    LayerSpec {
        neuron_ids,
        is_output: false,
        is_dynamic: false,
    }
}

/// Chain `0 -> 1 -> ... -> last` plus the resonant feedback `4 -> 1`.
fn resonant_core_connections(last: NeuronId) -> Vec<ConnectionSpec> {
    let mut connections: Vec<_> = (0..last).map(|nid| direct(nid, nid + 1)).collect();
    connections.push(direct(4, 1));
    connections
}

fn without_reset(mut neurons: Vec<NeuronDescriptor>) -> Vec<NeuronDescriptor> {
    for neuron in &mut neurons {
        neuron.membrane_should_reset = false;
    }
    neurons
}

/// Resonant core, four detection lanes and one aggregation neuron.
pub fn default_template(decay: DecayParams, gain: f64) -> Template {
    let mut neurons = vec![
        NeuronDescriptor::relay(),
        decaying_neuron(
            vec![11.0 * gain, -9.0 * gain],
            decay,
            -gain,
            ActivationFunction::Identity,
        ),
    ];

    // ringing stages 2-4, then lane entries 5-8, lane pulses 9-12, lane outputs 13-16
    for (count, activation_function) in [
        (3, ActivationFunction::Identity),
        (4, ActivationFunction::Identity),
        (4, ActivationFunction::Binary),
        (4, ActivationFunction::Identity),
    ] {
        for _ in 0..count {
            neurons.push(decaying_neuron(
                vec![10.0 * gain],
                decay,
                -5.0 * gain,
                activation_function,
            ));
        }
    }

    neurons.push(NeuronDescriptor {
        synapse_weights: vec![AGGREGATION_WEIGHT; LANE_SOURCES.len()],
        leakage_factor: AGGREGATION_LEAKAGE_FACTOR,
        leakage_period: LeakagePeriod::Finite(AGGREGATION_LEAKAGE_PERIOD),
        theta: AGGREGATION_THETA,
        threshold_pulse: AGGREGATION_THRESHOLD_PULSE,
        activation_function: ActivationFunction::Identity,
        ..NeuronDescriptor::default()
    });

    let mut connections = resonant_core_connections(8);

    for (lane, &source) in LANE_SOURCES.iter().enumerate() {
        connections.push(direct(source, LANE_PULSE_OFFSET + lane));
        connections.push(direct(source, LANE_OUTPUT_OFFSET + lane));
        connections.push(direct(LANE_OUTPUT_OFFSET + lane, AGGREGATION_NID));
        connections.push(gated(LANE_PULSE_OFFSET + lane, LANE_OUTPUT_OFFSET + lane));
    }

    Template {
        amplitude: AMPLITUDE_SCALE * gain,
        neurons: without_reset(neurons),
        connections,
        layers: vec![
            hidden_layer(0..=0),
            hidden_layer(1..=4),
            hidden_layer(5..=8),
            hidden_layer(9..=12),
            hidden_layer(13..=16),
            hidden_layer(17..=17),
        ],
    }
}

/// Resonant core only, with every gain taken from calibration data.
pub fn optimization_template(decay: DecayParams, record: &CalibrationRecord) -> Template {
    let weight_gains = &record.weight_gains;
    let theta_gains = &record.theta_gains;

    let mut neurons = vec![
        NeuronDescriptor::relay(),
        decaying_neuron(
            vec![10.0 * weight_gains[0], -10.0 * weight_gains[1]],
            decay,
            -theta_gains[0],
            ActivationFunction::Identity,
        ),
    ];

    for i in 0..3 {
        neurons.push(decaying_neuron(
            vec![10.0 * weight_gains[2 + i]],
            decay,
            -5.0 * theta_gains[1 + i],
            ActivationFunction::Identity,
        ));
    }

    Template {
        amplitude: AMPLITUDE_SCALE * record.amplitude_gain,
        neurons: without_reset(neurons),
        connections: resonant_core_connections(4),
        layers: vec![hidden_layer(0..=0), hidden_layer(1..=3), hidden_layer(4..=4)],
    }
}
