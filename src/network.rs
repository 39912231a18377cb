use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::engine::NetworkEngine;
use crate::error::{ResonatorError, Result};
use crate::gain;
use crate::neuron::NeuronDescriptor;
use crate::types::{HashMap, HashSet, NeuronId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: NeuronId,
    pub target: NeuronId,
    pub weight: Option<f64>,
    /// Disabled connections exist structurally but do not consume a synapse
    /// slot and only transmit once the engine enables them.
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub neuron_ids: Vec<NeuronId>,
    pub is_output: bool,
    pub is_dynamic: bool,
}

/// Serializing dumps the design only. A reloaded network is unsealed and
/// unrelated to any engine the original was deployed into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    amplitude: f64,
    neurons: Vec<NeuronDescriptor>,
    connections: Vec<Connection>,
    layers: Vec<Layer>,
    #[serde(skip)]
    sealed: bool,
}

impl Network {
    pub fn new(amplitude: f64) -> Result<Self> {
        gain::check_fixed_point(amplitude, "amplitude")?;

        Ok(Self {
            amplitude,
            neurons: Vec::new(),
            connections: Vec::new(),
            layers: Vec::new(),
            sealed: false,
        })
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn neurons(&self) -> &[NeuronDescriptor] {
        &self.neurons
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn get_num_neurons(&self) -> usize {
        self.neurons.len()
    }

    pub fn get_num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn has_connection(&self, source: NeuronId, target: NeuronId) -> bool {
        self.connections
            .iter()
            .any(|conn| conn.source == source && conn.target == target)
    }

    pub fn add_neuron(&mut self, neuron: NeuronDescriptor) -> Result<NeuronId> {
        self.ensure_mutable()?;
        neuron.check_numeric_range()?;

        self.neurons.push(neuron);
        Ok(self.neurons.len() - 1)
    }

    pub fn connect(&mut self, source: NeuronId, target: NeuronId) -> Result<()> {
        self.push_connection(source, target, None, true)
    }

    pub fn connect_with_weight(
        &mut self,
        source: NeuronId,
        target: NeuronId,
        weight: f64,
    ) -> Result<()> {
        gain::check_fixed_point(weight, "connection weight")?;
        self.push_connection(source, target, Some(weight), true)
    }

    pub fn connect_enable(&mut self, source: NeuronId, target: NeuronId) -> Result<()> {
        self.push_connection(source, target, None, false)
    }

    /// Appends a layer. Layers must partition the neuron ids in creation
    /// order, so `neuron_ids` has to continue right where the previous layer
    /// ended.
    pub fn add_layer(
        &mut self,
        neuron_ids: Vec<NeuronId>,
        is_output: bool,
        is_dynamic: bool,
    ) -> Result<()> {
        self.ensure_mutable()?;

        let next_id = self.get_num_layered_neurons();

        match neuron_ids.first() {
            None => {
                return Err(ResonatorError::InvalidTopology(
                    "layer must not be empty".to_string(),
                ))
            }
            Some(&first) if first != next_id => {
                return Err(ResonatorError::InvalidTopology(format!(
                    "layer must start at neuron {}, got {}",
                    next_id, first
                )))
            }
            _ => {}
        }

        if let Some((prev, next)) = neuron_ids
            .iter()
            .tuple_windows()
            .find(|(prev, next)| **next != **prev + 1)
        {
            return Err(ResonatorError::InvalidTopology(format!(
                "layer neurons must be consecutive, got {} after {}",
                next, prev
            )));
        }

        for &nid in &neuron_ids {
            self.check_nid(nid)?;
        }

        self.layers.push(Layer {
            neuron_ids,
            is_output,
            is_dynamic,
        });

        Ok(())
    }

    /// Checks the structural invariants of a fully built network.
    pub fn validate(&self) -> Result<()> {
        if self.get_num_layered_neurons() != self.neurons.len() {
            return Err(ResonatorError::InvalidTopology(format!(
                "layers cover {} of {} neurons",
                self.get_num_layered_neurons(),
                self.neurons.len()
            )));
        }

        let mut seen_connections = HashSet::default();
        let mut fan_in: HashMap<NeuronId, usize> = HashMap::default();

        for conn in &self.connections {
            self.check_nid(conn.source)?;
            self.check_nid(conn.target)?;

            if !seen_connections.insert((conn.source, conn.target)) {
                return Err(ResonatorError::InvalidTopology(format!(
                    "duplicate connection from neuron {} to neuron {}",
                    conn.source, conn.target
                )));
            }

            if conn.enabled {
                *fan_in.entry(conn.target).or_default() += 1;
            }
        }

        for (nid, neuron) in self.neurons.iter().enumerate() {
            let num_inputs = fan_in.get(&nid).copied().unwrap_or(0);

            if num_inputs != neuron.fan_in() {
                return Err(ResonatorError::InvalidTopology(format!(
                    "neuron {} has {} synapse weights but {} incoming connections",
                    nid,
                    neuron.fan_in(),
                    num_inputs
                )));
            }
        }

        Ok(())
    }

    /// Replays the topology into `engine` and seals the network against
    /// further changes.
    pub fn deploy<E: NetworkEngine + ?Sized>(&mut self, engine: &mut E) -> Result<()> {
        self.validate()?;

        engine.set_amplitude(self.amplitude);

        for (expected_nid, neuron) in self.neurons.iter().enumerate() {
            let nid = engine.add_neuron(neuron);

            if nid != expected_nid {
                return Err(ResonatorError::InvalidState(format!(
                    "engine assigned id {} to neuron {}",
                    nid, expected_nid
                )));
            }
        }

        for conn in &self.connections {
            if conn.enabled {
                engine.connect(conn.source, conn.target, conn.weight);
            } else {
                engine.connect_enable(conn.source, conn.target);
            }
        }

        for layer in &self.layers {
            engine.add_layer(&layer.neuron_ids, layer.is_output, layer.is_dynamic);
        }

        self.sealed = true;

        log::debug!(
            "deployed network with {} neurons, {} connections and {} layers",
            self.neurons.len(),
            self.connections.len(),
            self.layers.len()
        );

        Ok(())
    }

    fn push_connection(
        &mut self,
        source: NeuronId,
        target: NeuronId,
        weight: Option<f64>,
        enabled: bool,
    ) -> Result<()> {
        self.ensure_mutable()?;
        self.check_nid(source)?;
        self.check_nid(target)?;

        self.connections.push(Connection {
            source,
            target,
            weight,
            enabled,
        });

        Ok(())
    }

    fn get_num_layered_neurons(&self) -> usize {
        self.layers.iter().map(|layer| layer.neuron_ids.len()).sum()
    }

    fn check_nid(&self, nid: NeuronId) -> Result<()> {
        if nid >= self.neurons.len() {
            return Err(ResonatorError::InvalidTopology(format!(
                "invalid neuron id: {}",
                nid
            )));
        }

        Ok(())
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.sealed {
            return Err(ResonatorError::InvalidState(
                "network has been deployed and can no longer be changed".to_string(),
            ));
        }

        Ok(())
    }
}
