//! Engine configuration.
//!
//! Bundles the strategy catalog with the constant tables and scenario presets.
//! Users supply it as YAML, JSON or TOML; every loader validates before returning.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::catalog::StrategyCatalog;
use crate::error::{AedesError, Result};
use crate::scenario::ScenarioProfile;
use crate::tables::{CoefficientTable, ContextMultipliers, UrgencyTable};

/// Complete ranking configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AedesConfig {
    /// Indicators, thresholds and weighted strategies
    pub catalog: StrategyCatalog,

    /// Factor-score coefficients
    #[serde(default)]
    pub coefficients: CoefficientTable,

    /// Urgency multipliers by risk level and strategy type
    #[serde(default)]
    pub urgency: UrgencyTable,

    /// Named scenario contexts
    #[serde(default)]
    pub contexts: BTreeMap<String, ContextMultipliers>,

    /// Preset scenarios
    #[serde(default)]
    pub scenarios: Vec<ScenarioProfile>,

    /// Rescale strategy weights to sum to 1.0 on load
    #[serde(default)]
    pub normalise_weights: bool,
}

impl AedesConfig {
    pub fn validate(&self) -> Result<()> {
        self.catalog.validate()?;
        self.coefficients.validate(self.catalog.strategy_ids())?;
        self.urgency.validate()?;

        for (name, ctx) in &self.contexts {
            ctx.validate(name, self.catalog.strategy_ids())?;
        }

        for scenario in &self.scenarios {
            scenario.validate()?;
            if let Some(id) = scenario
                .expected_strategies
                .iter()
                .find(|id| self.catalog.strategy(id).is_none())
            {
                return Err(AedesError::UnknownStrategy(format!(
                    "{id} (expected by scenario '{}')",
                    scenario.id
                )));
            }
            if let Some(ctx) = &scenario.context {
                if !self.contexts.contains_key(ctx) {
                    return Err(AedesError::Config(format!(
                        "scenario '{}' references unknown context '{ctx}'",
                        scenario.id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn scenario(&self, id: &str) -> Option<&ScenarioProfile> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn context(&self, name: &str) -> Option<&ContextMultipliers> {
        self.contexts.get(name)
    }

    fn finish(mut self) -> Result<Self> {
        if self.normalise_weights {
            self.catalog.normalise_weights();
        }
        self.validate()?;
        Ok(self)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str::<Self>(content)?.finish()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str::<Self>(content)?.finish()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)?.finish()
    }

    /// Load from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("loading {}", path.display()))?;
        tracing::debug!(
            strategies = config.catalog.strategies.len(),
            indicators = config.catalog.indicators.len(),
            "loaded config from {}",
            path.display()
        );
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Self::from_json_str(&content)
            .with_context(|| format!("loading {}", path.display()))?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
