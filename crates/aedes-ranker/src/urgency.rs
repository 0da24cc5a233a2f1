//! Urgency adjustment of combined scores.
//! The adjusted score is not renormalised and may exceed 1.0; only the
//! relative order matters downstream.

use aedes_common::{ContextMultipliers, Result, RiskLevel, StrategyType, UrgencyTable};

/// combined × multiplier(risk level, strategy type).
pub fn adjust(
    combined_score: f64,
    risk_level: RiskLevel,
    strategy_type: StrategyType,
    table: &UrgencyTable,
) -> Result<f64> {
    Ok(combined_score * table.multiplier(risk_level, strategy_type)?)
}

/// Urgency adjustment followed by the optional scenario context multiplier.
pub fn adjust_in_context(
    combined_score: f64,
    strategy: &str,
    risk_level: RiskLevel,
    strategy_type: StrategyType,
    table: &UrgencyTable,
    context: Option<&ContextMultipliers>,
) -> Result<f64> {
    let adjusted = adjust(combined_score, risk_level, strategy_type, table)?;
    Ok(match context {
        Some(ctx) => adjusted * ctx.multiplier(strategy),
        None => adjusted,
    })
}
