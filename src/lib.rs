pub mod calibration;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod gain;
pub mod network;
pub mod neuron;
pub mod observer;
pub mod params;
pub mod resonator;
pub mod sweep;
pub mod template;

mod types;
mod util;

pub use types::NeuronId;
