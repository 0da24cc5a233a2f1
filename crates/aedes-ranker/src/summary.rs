//! Critical vs normal indicator counts for a snapshot, independent of any strategy.

use aedes_common::{StrategyCatalog, ThresholdCondition};
use serde::{Deserialize, Serialize};

use crate::source::IndicatorSource;
use crate::threshold;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalIndicator {
    pub condition: ThresholdCondition,
    pub value: f64,
    /// Distance past the threshold, positive into the critical zone.
    pub excess: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSummary {
    pub critical: usize,
    pub normal: usize,
    /// Declared indicators with no value in the snapshot.
    pub unreported: usize,
    /// Sorted by |excess| descending, then indicator name.
    pub critical_indicators: Vec<CriticalIndicator>,
}

impl IndicatorSummary {
    pub fn evaluated(&self) -> usize {
        self.critical + self.normal
    }

    /// Share of evaluated indicators in a critical state, 0–100.
    pub fn critical_pct(&self) -> f64 {
        match self.evaluated() {
            0 => 0.0,
            n => self.critical as f64 / n as f64 * 100.0,
        }
    }
}

/// Classify every declared indicator that has a value.
pub fn summarise(catalog: &StrategyCatalog, source: &dyn IndicatorSource) -> IndicatorSummary {
    let mut summary = IndicatorSummary::default();

    for condition in catalog.conditions() {
        let Some(value) = source.value(&condition.indicator) else {
            summary.unreported += 1;
            continue;
        };
        if threshold::satisfies(value, &condition) {
            summary.critical += 1;
            summary.critical_indicators.push(CriticalIndicator {
                excess: threshold::excess(value, &condition),
                condition,
                value,
            });
        } else {
            summary.normal += 1;
        }
    }

    summary.critical_indicators.sort_by(|a, b| {
        b.excess
            .abs()
            .total_cmp(&a.excess.abs())
            .then_with(|| a.condition.indicator.cmp(&b.condition.indicator))
    });
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticIndicators;
    use aedes_common::{Comparison, IndicatorDef, IndicatorDomain, Threshold};

    fn catalog() -> StrategyCatalog {
        let ind = |name: &str, op, v| IndicatorDef {
            name: name.to_string(),
            domain: IndicatorDomain::Epidemiological,
            threshold: Threshold::new(op, v).unwrap(),
        };
        StrategyCatalog {
            version: "test".into(),
            indicators: vec![
                ind("IB", Comparison::Gt, 20.0),
                ind("IV", Comparison::Gt, 10.0),
                ind("Insumos", Comparison::Lt, 70.0),
                ind("Letalidad", Comparison::Gt, 0.05),
            ],
            strategies: vec![],
        }
    }

    #[test]
    fn test_counts_and_order() {
        let source = StaticIndicators::new()
            .with("IB", 35.0)
            .with("IV", 4.0)
            .with("Insumos", 40.0);
        let summary = summarise(&catalog(), &source);

        assert_eq!(summary.critical, 2);
        assert_eq!(summary.normal, 1);
        assert_eq!(summary.unreported, 1);
        assert_eq!(summary.evaluated(), 3);

        let names: Vec<&str> = summary
            .critical_indicators
            .iter()
            .map(|c| c.condition.indicator.as_str())
            .collect();
        // Insumos is 30 below, IB 15 above
        assert_eq!(names, vec!["Insumos", "IB"]);
        assert_eq!(summary.critical_indicators[0].excess, 30.0);
    }

    #[test]
    fn test_critical_pct() {
        let source = StaticIndicators::new().with("IB", 35.0).with("IV", 4.0);
        let summary = summarise(&catalog(), &source);
        assert!((summary.critical_pct() - 50.0).abs() < 1e-12);
        assert_eq!(IndicatorSummary::default().critical_pct(), 0.0);
    }

    #[test]
    fn test_nan_counts_as_normal() {
        let source = StaticIndicators::new().with("IB", f64::NAN);
        let summary = summarise(&catalog(), &source);
        assert_eq!(summary.critical, 0);
        assert_eq!(summary.normal, 1);
    }
}
