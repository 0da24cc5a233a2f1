//! Indicator compliance: weighted share of a strategy's indicator
//! conditions currently met.

use aedes_common::{AedesError, RankWarning, Result, StrategyCatalog, StrategyDef};
use serde::{Deserialize, Serialize};

use crate::source::IndicatorSource;
use crate::threshold;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceScore {
    /// Σ weight × satisfied; in [0, 1] when weights sum to 1.
    pub raw: f64,
    /// Number of indicator conditions met.
    pub satisfied: usize,
    pub total: usize,
}

/// Compliance of one strategy plus any non-fatal findings about its configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceOutcome {
    pub score: ComplianceScore,
    pub warnings: Vec<RankWarning>,
}

pub fn compliance_raw(
    strategy: &StrategyDef,
    catalog: &StrategyCatalog,
    source: &dyn IndicatorSource,
) -> Result<ComplianceOutcome> {
    let mut warnings = Vec::new();

    if strategy.indicators.is_empty() {
        let warning = RankWarning::NoIndicators {
            strategy: strategy.id.clone(),
        };
        tracing::warn!("{warning}");
        warnings.push(warning);
        return Ok(ComplianceOutcome {
            score: ComplianceScore { raw: 0.0, satisfied: 0, total: 0 },
            warnings,
        });
    }

    if !strategy.weights_balanced() {
        let warning = RankWarning::MalformedWeights {
            strategy: strategy.id.clone(),
            sum: strategy.weight_sum(),
        };
        tracing::warn!("{warning}");
        warnings.push(warning);
    }

    let mut raw = 0.0;
    let mut satisfied = 0;
    for w in &strategy.indicators {
        let def = catalog
            .indicator(&w.indicator)
            .ok_or_else(|| AedesError::UnknownIndicator {
                strategy: strategy.id.clone(),
                indicator: w.indicator.clone(),
            })?;
        if threshold::evaluate(source, &def.condition())? {
            raw += w.weight;
            satisfied += 1;
        }
    }

    Ok(ComplianceOutcome {
        score: ComplianceScore {
            raw,
            satisfied,
            total: strategy.indicators.len(),
        },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticIndicators;
    use aedes_common::{
        Comparison, IndicatorDef, IndicatorDomain, IndicatorWeight, StrategyType, Threshold,
    };

    fn catalog() -> StrategyCatalog {
        let ind = |name: &str, op, v| IndicatorDef {
            name: name.to_string(),
            domain: IndicatorDomain::Entomological,
            threshold: Threshold::new(op, v).unwrap(),
        };
        StrategyCatalog {
            version: "test".into(),
            indicators: vec![
                ind("IB", Comparison::Gt, 20.0),
                ind("IV", Comparison::Gt, 10.0),
                ind("Insumos", Comparison::Lt, 70.0),
            ],
            strategies: vec![],
        }
    }

    fn strategy(weights: &[(&str, f64)]) -> StrategyDef {
        StrategyDef {
            id: "Larvicidas".to_string(),
            strategy_type: StrategyType::Active,
            indicators: weights
                .iter()
                .map(|(i, w)| IndicatorWeight { indicator: i.to_string(), weight: *w })
                .collect(),
        }
    }

    #[test]
    fn test_partial_compliance() {
        let source = StaticIndicators::new()
            .with("IB", 35.0)
            .with("IV", 4.0)
            .with("Insumos", 55.0);
        let out = compliance_raw(
            &strategy(&[("IB", 0.5), ("IV", 0.3), ("Insumos", 0.2)]),
            &catalog(),
            &source,
        )
        .unwrap();
        assert!((out.score.raw - 0.7).abs() < 1e-12);
        assert_eq!(out.score.satisfied, 2);
        assert_eq!(out.score.total, 3);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_full_compliance_is_one() {
        let source = StaticIndicators::new().with("IB", 35.0).with("IV", 18.0);
        let out = compliance_raw(&strategy(&[("IB", 0.6), ("IV", 0.4)]), &catalog(), &source)
            .unwrap();
        assert!((out.score.raw - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_indicators_warns_and_scores_zero() {
        let out = compliance_raw(&strategy(&[]), &catalog(), &StaticIndicators::new()).unwrap();
        assert_eq!(out.score.raw, 0.0);
        assert_eq!(
            out.warnings,
            vec![RankWarning::NoIndicators { strategy: "Larvicidas".into() }]
        );
    }

    #[test]
    fn test_unbalanced_weights_warn_and_keep_raw_sum() {
        let source = StaticIndicators::new().with("IB", 35.0).with("IV", 18.0);
        let out = compliance_raw(&strategy(&[("IB", 0.6), ("IV", 0.6)]), &catalog(), &source)
            .unwrap();
        assert!((out.score.raw - 1.2).abs() < 1e-12);
        assert!(matches!(
            out.warnings.as_slice(),
            [RankWarning::MalformedWeights { .. }]
        ));
    }

    #[test]
    fn test_missing_value_is_fatal() {
        let source = StaticIndicators::new().with("IB", 35.0);
        let err = compliance_raw(&strategy(&[("IB", 0.5), ("IV", 0.5)]), &catalog(), &source)
            .unwrap_err();
        assert!(matches!(err, AedesError::MissingIndicator { indicator } if indicator == "IV"));
    }
}
