use std::error::Error;
use std::fs;

use resonator::calibration::CalibrationStore;
use resonator::observer::LogObserver;
use resonator::resonator::{self as res, Resonator, ResonatorVariant};
use serde::Serialize;

#[path = "../scenario_params.rs"]
mod scenario_params;

#[derive(Debug, Serialize)]
struct FilterSummary {
    freq0: f64,
    num_neurons: usize,
    num_connections: usize,
    num_layers: usize,
    amplitude: f64,
}

fn summarize<R: ResonatorVariant>(resonator: &R) -> FilterSummary {
    let network = resonator.network();

    FilterSummary {
        freq0: resonator.freq0(),
        num_neurons: network.get_num_neurons(),
        num_connections: network.connections().len(),
        num_layers: network.get_num_layers(),
        amplitude: network.amplitude(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let scenario = match std::env::args().nth(1) {
        Some(path) => serde_yaml::from_str(&fs::read_to_string(path)?)?,
        None => scenario_params::get_scenario_params()?,
    };

    let mut observer = LogObserver;
    let mut summaries = Vec::new();

    for &freq0 in &scenario.frequencies {
        let summary = match &scenario.calibration_root {
            Some(root) => {
                let store = CalibrationStore::new(root);
                summarize(&res::create_custom_resonator(
                    &store,
                    freq0,
                    scenario.pulse_clock,
                    &mut observer,
                )?)
            }
            None => summarize(&Resonator::new(freq0, scenario.pulse_clock, &mut observer)?),
        };

        summaries.push(summary);
    }

    println!("{}", serde_json::to_string_pretty(&summaries)?);

    Ok(())
}
