//! Versioned constant tables consumed by the ranker: urgency multipliers,
//! factor coefficients and scenario context multipliers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{FactorChannel, RiskLevel, StrategyType};
use crate::error::{AedesError, Result};

// ── Urgency multipliers ──────────────────────────────────────────────────────

/// Multiplier applied to a strategy's combined score, indexed by
/// (risk level, strategy type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyTable {
    pub version: String,
    pub multipliers: BTreeMap<RiskLevel, BTreeMap<StrategyType, f64>>,
}

impl Default for UrgencyTable {
    /// Built-in table v1. Low risk favours prevention and monitoring;
    /// emergency shifts almost all weight to immediate response.
    fn default() -> Self {
        use StrategyType::*;
        let row = |v: [f64; 5]| -> BTreeMap<StrategyType, f64> {
            [Immediate, Active, Preventive, Coordination, Monitoring]
                .into_iter()
                .zip(v)
                .collect()
        };
        let multipliers = BTreeMap::from([
            (RiskLevel::Low, row([0.2, 0.5, 1.8, 1.5, 1.7])),
            (RiskLevel::Moderate, row([0.4, 1.6, 0.9, 1.2, 1.3])),
            (RiskLevel::High, row([1.8, 1.3, 0.4, 1.0, 0.6])),
            (RiskLevel::Emergency, row([2.5, 0.9, 0.2, 0.7, 0.3])),
        ]);
        Self {
            version: "urgency-v1".to_string(),
            multipliers,
        }
    }
}

impl UrgencyTable {
    /// Look up the multiplier. A missing entry is a configuration defect,
    /// never a silent 1.0.
    pub fn multiplier(&self, risk_level: RiskLevel, strategy_type: StrategyType) -> Result<f64> {
        self.multipliers
            .get(&risk_level)
            .and_then(|row| row.get(&strategy_type))
            .copied()
            .ok_or(AedesError::UnknownStrategyType {
                risk_level,
                strategy_type,
            })
    }

    pub fn validate(&self) -> Result<()> {
        for (level, row) in &self.multipliers {
            for (kind, m) in row {
                if !m.is_finite() || *m <= 0.0 {
                    return Err(AedesError::Config(format!(
                        "urgency multiplier for {level}/{kind} must be positive, got {m}"
                    )));
                }
            }
        }
        Ok(())
    }
}

// ── Factor coefficients ──────────────────────────────────────────────────────

/// Coefficients weighting each factor channel in the factor score.
///
/// `coefficient(channel, strategy)` resolves, in order: the global entry
/// (scenario-wide channels such as risk perception), the strategy's own
/// contextual row, the default contextual row, else 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientTable {
    pub version: String,
    #[serde(default)]
    pub global: BTreeMap<FactorChannel, f64>,
    #[serde(default)]
    pub default_contextual: BTreeMap<FactorChannel, f64>,
    #[serde(default)]
    pub by_strategy: BTreeMap<String, BTreeMap<FactorChannel, f64>>,
}

impl Default for CoefficientTable {
    fn default() -> Self {
        use FactorChannel::*;
        Self {
            version: "coefficients-v1".to_string(),
            global: BTreeMap::from([
                (RiskPerception, 0.8),
                (VectorResistance, 0.5),
                (OtherFoci, 0.3),
                (OutbreakMagnitude, 0.7),
            ]),
            default_contextual: BTreeMap::from([
                (ResourceAvailability, 0.5),
                (OperatingCost, 0.0),
                (TimeToCoverage, 0.5),
                (ExternalDependencies, 0.0),
                (CommunityAcceptance, 0.5),
                (PropertyAccess, 0.5),
                (ExpectedEffectiveness, 0.6),
            ]),
            by_strategy: BTreeMap::new(),
        }
    }
}

impl CoefficientTable {
    pub fn coefficient(&self, channel: FactorChannel, strategy: &str) -> f64 {
        if let Some(c) = self.global.get(&channel) {
            return *c;
        }
        self.by_strategy
            .get(strategy)
            .and_then(|row| row.get(&channel))
            .or_else(|| self.default_contextual.get(&channel))
            .copied()
            .unwrap_or(0.0)
    }

    /// Fully enumerated coefficient row for one strategy.
    pub fn row(&self, strategy: &str) -> [f64; FactorChannel::COUNT] {
        let mut row = [0.0; FactorChannel::COUNT];
        for channel in FactorChannel::ALL {
            row[channel.index()] = self.coefficient(channel, strategy);
        }
        row
    }

    /// Coefficients must be finite and every per-strategy row must name a
    /// strategy in `known`.
    pub fn validate<'a>(&self, known: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let known: Vec<&str> = known.into_iter().collect();
        if let Some(strategy) = self
            .by_strategy
            .keys()
            .find(|id| !known.contains(&id.as_str()))
        {
            return Err(AedesError::UnknownStrategy(format!(
                "{strategy} (coefficients '{}')",
                self.version
            )));
        }

        let rows = std::iter::once(("global", &self.global))
            .chain(std::iter::once(("default", &self.default_contextual)))
            .chain(self.by_strategy.iter().map(|(k, v)| (k.as_str(), v)));
        for (name, row) in rows {
            if let Some((channel, c)) = row.iter().find(|(_, c)| !c.is_finite()) {
                return Err(AedesError::Config(format!(
                    "coefficient {channel} in row '{name}' is not finite: {c}"
                )));
            }
        }
        Ok(())
    }
}

// ── Context multipliers ──────────────────────────────────────────────────────

/// Named scenario context (e.g. heavy rains, intermittent water supply)
/// boosting or damping specific strategies after the urgency adjustment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextMultipliers {
    #[serde(default)]
    pub description: String,
    /// Keyed by exact strategy id. Absent strategies get 1.0.
    pub multipliers: BTreeMap<String, f64>,
}

impl ContextMultipliers {
    pub fn multiplier(&self, strategy: &str) -> f64 {
        self.multipliers.get(strategy).copied().unwrap_or(1.0)
    }

    pub fn validate<'a>(&self, name: &str, known: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let known: Vec<&str> = known.into_iter().collect();
        for (strategy, m) in &self.multipliers {
            if !known.contains(&strategy.as_str()) {
                return Err(AedesError::UnknownStrategy(format!(
                    "{strategy} (context '{name}')"
                )));
            }
            if !m.is_finite() || *m <= 0.0 {
                return Err(AedesError::Config(format!(
                    "context '{name}' multiplier for '{strategy}' must be positive, got {m}"
                )));
            }
        }
        Ok(())
    }
}
