//! Shared fixtures for the Aedes workspace tests.

use std::collections::BTreeMap;

use aedes_common::{AedesConfig, RiskLevel, StrategyFactors};

/// Nine-strategy sample configuration with the four preset scenarios.
pub const SAMPLE_CONFIG_YAML: &str = include_str!("../fixtures/aedes.yaml");

pub fn sample_config() -> AedesConfig {
    AedesConfig::from_yaml_str(SAMPLE_CONFIG_YAML).expect("sample config must load")
}

/// Preset ids in increasing alert level.
pub const SCENARIO_IDS: [&str; 4] = ["bajo_riesgo", "riesgo_moderado", "alto_riesgo", "emergencia"];

/// Factor vector the presets use at each risk level.
pub fn preset_factors(level: RiskLevel) -> StrategyFactors {
    StrategyFactors::new(match level {
        RiskLevel::Low => [8.0, 3.0, 7.0, 2.0, 8.0, 8.0, 6.0, 2.0, 2.0, 7.0, 2.0],
        RiskLevel::Moderate => [6.0, 5.0, 5.0, 4.0, 6.0, 6.0, 5.0, 4.0, 3.0, 6.0, 5.0],
        RiskLevel::High => [4.0, 7.0, 4.0, 6.0, 5.0, 5.0, 7.0, 5.0, 5.0, 6.0, 8.0],
        RiskLevel::Emergency => [2.0, 9.0, 2.0, 8.0, 3.0, 4.0, 9.0, 7.0, 7.0, 4.0, 10.0],
    })
}

/// Indicator snapshot from `(name, value)` pairs.
pub fn snapshot(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Install a test-writer subscriber honouring `RUST_LOG`; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Load a config from an arbitrary YAML string, panicking with the full error chain.
pub fn config_from_yaml(yaml: &str) -> AedesConfig {
    match AedesConfig::from_yaml_str(yaml).map_err(anyhow::Error::from) {
        Ok(config) => config,
        Err(e) => panic!("config failed to load: {e:#}"),
    }
}
