use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterBankScenario {
    pub pulse_clock: f64,
    pub frequencies: Vec<f64>,
    pub calibration_root: Option<String>,
}

pub fn get_scenario_params() -> Result<FilterBankScenario, serde_yaml::Error> {
    let params_yaml_str = r#"
pulse_clock: 1536000.0
frequencies:
- 100.0
- 250.0
- 500.0
- 1000.0
- 2000.0
- 4000.0
calibration_root: null
"#;

    serde_yaml::from_str(params_yaml_str)
}
