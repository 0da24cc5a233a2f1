//! Threshold evaluation: does an indicator value meet its critical condition?

use aedes_common::{AedesError, Comparison, Result, ThresholdCondition};

use crate::source::IndicatorSource;

/// Compare `value` against the condition's threshold.
/// NaN never satisfies a condition, whatever the operator.
pub fn satisfies(value: f64, condition: &ThresholdCondition) -> bool {
    if value.is_nan() {
        return false;
    }
    let t = condition.threshold;
    match condition.op {
        Comparison::Lt => value < t,
        Comparison::Le => value <= t,
        Comparison::Gt => value > t,
        Comparison::Ge => value >= t,
    }
}

/// Resolve the condition's indicator from `source` and evaluate it.
pub fn evaluate(source: &dyn IndicatorSource, condition: &ThresholdCondition) -> Result<bool> {
    let value = source
        .value(&condition.indicator)
        .ok_or_else(|| AedesError::MissingIndicator {
            indicator: condition.indicator.clone(),
        })?;
    Ok(satisfies(value, condition))
}

/// How far past the threshold a value sits, signed so that a positive
/// result means "further into the critical zone".
pub fn excess(value: f64, condition: &ThresholdCondition) -> f64 {
    if condition.op.is_upper() {
        value - condition.threshold
    } else {
        condition.threshold - value
    }
}
