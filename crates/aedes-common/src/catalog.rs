//! Strategy catalog: declared indicators, their thresholds, and the
//! weighted indicator set of every candidate strategy.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entities::{IndicatorDomain, StrategyType, Threshold, ThresholdCondition};
use crate::error::{AedesError, Result};

/// Allowed deviation of a strategy's weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDef {
    pub name: String,
    pub domain: IndicatorDomain,
    /// Crossing this threshold puts the indicator in a critical state.
    pub threshold: Threshold,
}

impl IndicatorDef {
    pub fn condition(&self) -> ThresholdCondition {
        ThresholdCondition::new(self.name.clone(), self.threshold.op, self.threshold.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorWeight {
    pub indicator: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDef {
    /// The strategy description doubles as its key.
    pub id: String,
    #[serde(rename = "type")]
    pub strategy_type: StrategyType,
    #[serde(default)]
    pub indicators: Vec<IndicatorWeight>,
}

impl StrategyDef {
    pub fn weight_sum(&self) -> f64 {
        self.indicators.iter().map(|w| w.weight).sum()
    }

    pub fn weights_balanced(&self) -> bool {
        (self.weight_sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyCatalog {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub indicators: Vec<IndicatorDef>,
    #[serde(default)]
    pub strategies: Vec<StrategyDef>,
}

fn default_version() -> String { "unversioned".to_string() }

impl StrategyCatalog {
    pub fn indicator(&self, name: &str) -> Option<&IndicatorDef> {
        self.indicators.iter().find(|i| i.name == name)
    }

    pub fn strategy(&self, id: &str) -> Option<&StrategyDef> {
        self.strategies.iter().find(|s| s.id == id)
    }

    pub fn strategy_ids(&self) -> impl Iterator<Item = &str> {
        self.strategies.iter().map(|s| s.id.as_str())
    }

    /// Threshold condition of every declared indicator, in declaration order.
    pub fn conditions(&self) -> impl Iterator<Item = ThresholdCondition> + '_ {
        self.indicators.iter().map(IndicatorDef::condition)
    }

    /// Check the identifier sets are closed and weights are well-formed.
    /// Weight sums are not checked here; an unbalanced strategy is a warning at ranking time.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for ind in &self.indicators {
            if !names.insert(ind.name.as_str()) {
                return Err(AedesError::DuplicateIndicator(ind.name.clone()));
            }
            if !ind.threshold.value.is_finite() {
                return Err(AedesError::InvalidThreshold(format!(
                    "indicator '{}' has non-finite threshold",
                    ind.name
                )));
            }
        }

        let mut ids = HashSet::new();
        for strategy in &self.strategies {
            if !ids.insert(strategy.id.as_str()) {
                return Err(AedesError::DuplicateStrategy(strategy.id.clone()));
            }
            for w in &strategy.indicators {
                if !names.contains(w.indicator.as_str()) {
                    return Err(AedesError::UnknownIndicator {
                        strategy: strategy.id.clone(),
                        indicator: w.indicator.clone(),
                    });
                }
                if !w.weight.is_finite() || !(0.0..=1.0).contains(&w.weight) {
                    return Err(AedesError::InvalidWeight {
                        strategy: strategy.id.clone(),
                        indicator: w.indicator.clone(),
                        weight: w.weight,
                    });
                }
            }
        }
        Ok(())
    }

    /// Rescale each strategy's weights so they sum to 1.0.
    /// Strategies whose weights sum to zero are left untouched.
    pub fn normalise_weights(&mut self) {
        for strategy in &mut self.strategies {
            let sum = strategy.weight_sum();
            if sum > 0.0 {
                for w in &mut strategy.indicators {
                    w.weight /= sum;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Comparison;

    fn breteau() -> IndicatorDef {
        IndicatorDef {
            name: "Índice de Breteau (IB)".to_string(),
            domain: IndicatorDomain::Entomological,
            threshold: Threshold::new(Comparison::Gt, 20.0).unwrap(),
        }
    }

    fn strategy(id: &str, weights: &[(&str, f64)]) -> StrategyDef {
        StrategyDef {
            id: id.to_string(),
            strategy_type: StrategyType::Active,
            indicators: weights
                .iter()
                .map(|(i, w)| IndicatorWeight { indicator: i.to_string(), weight: *w })
                .collect(),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        let catalog = StrategyCatalog {
            version: "v1".into(),
            indicators: vec![breteau()],
            strategies: vec![strategy("S1", &[("Índice de Breteau (IB)", 1.0)])],
        };
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_undeclared_indicator() {
        let catalog = StrategyCatalog {
            version: "v1".into(),
            indicators: vec![breteau()],
            strategies: vec![strategy("S1", &[("Indice de Breteau", 1.0)])],
        };
        assert!(matches!(
            catalog.validate(),
            Err(AedesError::UnknownIndicator { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicates_and_bad_weights() {
        let dup = StrategyCatalog {
            version: "v1".into(),
            indicators: vec![breteau()],
            strategies: vec![strategy("S1", &[]), strategy("S1", &[])],
        };
        assert!(matches!(dup.validate(), Err(AedesError::DuplicateStrategy(_))));

        let bad = StrategyCatalog {
            version: "v1".into(),
            indicators: vec![breteau()],
            strategies: vec![strategy("S1", &[("Índice de Breteau (IB)", 1.5)])],
        };
        assert!(matches!(bad.validate(), Err(AedesError::InvalidWeight { .. })));
    }

    #[test]
    fn test_normalise_weights_restores_sum() {
        let mut catalog = StrategyCatalog {
            version: "v1".into(),
            indicators: vec![breteau()],
            strategies: vec![
                strategy("S1", &[("a", 3.0), ("b", 1.0)]),
                strategy("S2", &[("a", 0.0)]),
            ],
        };
        assert!(!catalog.strategies[0].weights_balanced());
        catalog.normalise_weights();
        assert!(catalog.strategies[0].weights_balanced());
        assert!((catalog.strategies[0].indicators[0].weight - 0.75).abs() < 1e-12);
        // zero-sum strategy is left as-is
        assert_eq!(catalog.strategies[1].indicators[0].weight, 0.0);
    }
}
