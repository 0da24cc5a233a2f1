//! Scenario presets and per-strategy factor assignment.
//!
//! A preset is an immutable value object: a named snapshot of indicator
//! values plus the factor vector applied to the strategies in that situation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{RiskLevel, StrategyFactors};
use crate::error::{AedesError, Result};

/// Factor vectors for a run: per-strategy overrides over an optional default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyFactorSet {
    #[serde(default)]
    pub default: Option<StrategyFactors>,
    #[serde(default)]
    pub by_strategy: BTreeMap<String, StrategyFactors>,
}

impl StrategyFactorSet {
    /// Every strategy gets the same vector.
    pub fn uniform(factors: StrategyFactors) -> Self {
        Self {
            default: Some(factors),
            by_strategy: BTreeMap::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>, factors: StrategyFactors) -> Self {
        self.by_strategy.insert(strategy.into(), factors);
        self
    }

    /// Every override must name a strategy in `known`; a misspelled key
    /// would otherwise fall through to the default vector.
    pub fn validate<'a>(&self, known: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let known: Vec<&str> = known.into_iter().collect();
        match self
            .by_strategy
            .keys()
            .find(|id| !known.contains(&id.as_str()))
        {
            Some(strategy) => Err(AedesError::UnknownStrategy(format!(
                "{strategy} (factor override)"
            ))),
            None => Ok(()),
        }
    }

    pub fn for_strategy(&self, strategy: &str) -> Result<&StrategyFactors> {
        self.by_strategy
            .get(strategy)
            .or(self.default.as_ref())
            .ok_or_else(|| AedesError::MissingFactors {
                strategy: strategy.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 1 = low … 4 = emergency.
    pub alert_level: u8,
    /// Overrides the level derived from `alert_level` when set.
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    pub indicators: BTreeMap<String, f64>,
    pub factors: StrategyFactors,
    /// Name of a context multiplier table to apply.
    #[serde(default)]
    pub context: Option<String>,
    /// Strategies the preset is expected to surface near the top.
    #[serde(default)]
    pub expected_strategies: Vec<String>,
}

impl ScenarioProfile {
    pub fn risk_level(&self) -> Result<RiskLevel> {
        match self.risk_level {
            Some(level) => Ok(level),
            None => RiskLevel::from_alert_level(self.alert_level).ok_or_else(|| {
                AedesError::Config(format!(
                    "scenario '{}' has alert level {} (expected 1..=4)",
                    self.id, self.alert_level
                ))
            }),
        }
    }

    pub fn factor_set(&self) -> StrategyFactorSet {
        StrategyFactorSet::uniform(self.factors)
    }

    pub fn validate(&self) -> Result<()> {
        self.risk_level()?;
        self.factors.validate(&format!("scenario:{}", self.id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::FactorChannel;

    fn profile(alert_level: u8) -> ScenarioProfile {
        ScenarioProfile {
            id: "alto_riesgo".into(),
            name: "Alto Riesgo - Brote Activo".into(),
            description: String::new(),
            alert_level,
            risk_level: None,
            indicators: BTreeMap::from([("Índice de Breteau (IB)".to_string(), 35.0)]),
            factors: StrategyFactors::uniform(5.0),
            context: None,
            expected_strategies: vec![],
        }
    }

    #[test]
    fn test_risk_level_from_alert_level() {
        assert_eq!(profile(3).risk_level().unwrap(), RiskLevel::High);

        let mut p = profile(3);
        p.risk_level = Some(RiskLevel::Emergency);
        assert_eq!(p.risk_level().unwrap(), RiskLevel::Emergency);

        assert!(profile(7).risk_level().is_err());
        assert!(profile(0).validate().is_err());
    }

    #[test]
    fn test_factor_set_lookup() {
        let set = StrategyFactorSet::uniform(StrategyFactors::uniform(5.0))
            .with_strategy("S2", StrategyFactors::uniform(9.0));
        assert_eq!(set.for_strategy("S1").unwrap().get(FactorChannel::OtherFoci), 5.0);
        assert_eq!(set.for_strategy("S2").unwrap().get(FactorChannel::OtherFoci), 9.0);

        let empty = StrategyFactorSet::default();
        assert!(matches!(
            empty.for_strategy("S1"),
            Err(AedesError::MissingFactors { .. })
        ));
    }

    #[test]
    fn test_factor_overrides_must_name_known_strategies() {
        let set = StrategyFactorSet::uniform(StrategyFactors::uniform(5.0))
            .with_strategy("Aplicar adulticidas", StrategyFactors::uniform(2.0));
        assert!(set.validate(["Aplicar adulticidas", "Protocolos de triage"]).is_ok());

        let typo = set.with_strategy("Aplicar adultcidas", StrategyFactors::uniform(9.0));
        assert!(matches!(
            typo.validate(["Aplicar adulticidas", "Protocolos de triage"]),
            Err(AedesError::UnknownStrategy(msg)) if msg.contains("Aplicar adultcidas")
        ));
    }

    #[test]
    fn test_validate_checks_factor_range() {
        let mut p = profile(2);
        p.factors = StrategyFactors::uniform(5.0).with(FactorChannel::OutbreakMagnitude, 11.0);
        assert!(matches!(p.validate(), Err(AedesError::InvalidFactorValue { .. })));
    }
}
