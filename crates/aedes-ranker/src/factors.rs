//! Factor score computation.
//!
//! F(s) = Σ_c v_c(s) × k(c, s)
//!
//! where v_c(s) is the strategy's 0–10 value on channel c and k(c, s) the
//! coefficient from the versioned `CoefficientTable` (global for
//! scenario-wide channels, contextual otherwise).

use aedes_common::{CoefficientTable, FactorChannel, Result, StrategyFactors};
use serde::{Deserialize, Serialize};

/// One channel's share of a factor score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub channel: FactorChannel,
    pub value: f64,
    pub coefficient: f64,
    pub contribution: f64,
}

/// Per-channel products for a strategy, in channel order.
pub fn factor_contributions(
    strategy: &str,
    factors: &StrategyFactors,
    coefficients: &CoefficientTable,
) -> Result<Vec<FactorContribution>> {
    factors.validate(strategy)?;
    let row = coefficients.row(strategy);

    Ok(factors
        .iter()
        .map(|(channel, value)| {
            let coefficient = row[channel.index()];
            FactorContribution {
                channel,
                value,
                coefficient,
                contribution: value * coefficient,
            }
        })
        .collect())
}

/// Raw factor score of a strategy. Fails with `InvalidFactorValue`
/// if any channel lies outside [0, 10].
pub fn factor_score_raw(
    strategy: &str,
    factors: &StrategyFactors,
    coefficients: &CoefficientTable,
) -> Result<f64> {
    Ok(factor_contributions(strategy, factors, coefficients)?
        .iter()
        .map(|c| c.contribution)
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aedes_common::AedesError;
    use std::collections::BTreeMap;

    /// Factor vector of the original high-risk preset.
    fn high_risk_factors() -> StrategyFactors {
        StrategyFactors::new([4.0, 7.0, 4.0, 6.0, 5.0, 5.0, 7.0, 5.0, 5.0, 6.0, 8.0])
    }

    #[test]
    fn test_default_table_score() {
        let table = CoefficientTable::default();
        let score = factor_score_raw("Any strategy", &high_risk_factors(), &table).unwrap();
        // contextual: 4*.5 + 7*0 + 4*.5 + 6*0 + 5*.5 + 5*.5 + 6*.6 = 12.6
        // global:     7*.8 + 5*.5 + 5*.3 + 8*.7                = 15.2
        assert!((score - 27.8).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn test_strategy_row_changes_score() {
        let mut table = CoefficientTable::default();
        table.by_strategy.insert(
            "Adulticidas".to_string(),
            BTreeMap::from([(FactorChannel::OperatingCost, -0.4)]),
        );
        let factors = high_risk_factors();
        let base = factor_score_raw("Otra", &factors, &table).unwrap();
        let costly = factor_score_raw("Adulticidas", &factors, &table).unwrap();
        assert!((base - costly - 2.8).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let table = CoefficientTable::default();
        let f = high_risk_factors();
        let a = factor_score_raw("S", &f, &table).unwrap();
        let b = factor_score_raw("S", &f, &table).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let table = CoefficientTable::default();
        let f = high_risk_factors().with(FactorChannel::ExpectedEffectiveness, -1.0);
        assert!(matches!(
            factor_score_raw("S", &f, &table),
            Err(AedesError::InvalidFactorValue { channel: FactorChannel::ExpectedEffectiveness, .. })
        ));
    }

    #[test]
    fn test_contributions_cover_every_channel() {
        let table = CoefficientTable::default();
        let parts = factor_contributions("S", &high_risk_factors(), &table).unwrap();
        assert_eq!(parts.len(), FactorChannel::COUNT);
        let magnitude = parts
            .iter()
            .find(|c| c.channel == FactorChannel::OutbreakMagnitude)
            .unwrap();
        assert!((magnitude.contribution - 5.6).abs() < 1e-12);
    }
}
