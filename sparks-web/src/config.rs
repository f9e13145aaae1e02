//! Simulator configuration embedded at build time.
use sparks_engine::SimulatorConfig;
use std::sync::OnceLock;

const SIMULATOR_JSON: &str = include_str!("../static/simulator.json");

static CONFIG: OnceLock<SimulatorConfig> = OnceLock::new();

/// Embedded configuration; falls back to the defaults if the file is invalid.
#[must_use]
pub fn simulator_config() -> &'static SimulatorConfig {
    CONFIG.get_or_init(|| {
        SimulatorConfig::from_json(SIMULATOR_JSON).unwrap_or_else(|err| {
            log::error!("embedded simulator config rejected: {err}");
            SimulatorConfig::default_config()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_matches_defaults() {
        let embedded = SimulatorConfig::from_json(SIMULATOR_JSON).unwrap();
        assert_eq!(&embedded, simulator_config());
        assert_eq!(embedded, SimulatorConfig::default_config());
    }
}
