//! Trait for indicator value access.
//!
//! Lets the ranker read the current indicator snapshot without caring
//! whether it came from a scenario preset, a loaded sheet, or a test fixture.

use std::collections::{BTreeMap, HashMap};

use aedes_common::Indicator;

/// Read-only snapshot of indicator values for one evaluation run.
///
/// Implementations can use:
/// - an in-memory map (scenario presets)
/// - a surveillance feed adapter
/// - mock data (testing)
pub trait IndicatorSource: Send + Sync {
    /// Current value of an indicator, or None if not supplied.
    fn value(&self, indicator: &str) -> Option<f64>;

    /// Check if the indicator has a value.
    fn has(&self, indicator: &str) -> bool {
        self.value(indicator).is_some()
    }
}

impl IndicatorSource for HashMap<String, f64> {
    fn value(&self, indicator: &str) -> Option<f64> {
        self.get(indicator).copied()
    }
}

impl IndicatorSource for BTreeMap<String, f64> {
    fn value(&self, indicator: &str) -> Option<f64> {
        self.get(indicator).copied()
    }
}

/// Readings as reported; the first reading for a name wins.
impl IndicatorSource for [Indicator] {
    fn value(&self, indicator: &str) -> Option<f64> {
        self.iter().find(|r| r.name == indicator).map(|r| r.value)
    }
}

impl IndicatorSource for Vec<Indicator> {
    fn value(&self, indicator: &str) -> Option<f64> {
        self.as_slice().value(indicator)
    }
}

impl<T: IndicatorSource + ?Sized> IndicatorSource for &T {
    fn value(&self, indicator: &str) -> Option<f64> {
        (**self).value(indicator)
    }
}

// ── Builder Implementation for Testing ─────────────────────────────────────

/// Builder-style provider with hardcoded values.
#[derive(Debug, Clone, Default)]
pub struct StaticIndicators {
    data: BTreeMap<String, f64>,
}

impl StaticIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an indicator value.
    pub fn with(mut self, indicator: &str, value: f64) -> Self {
        self.data.insert(indicator.to_string(), value);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl IndicatorSource for StaticIndicators {
    fn value(&self, indicator: &str) -> Option<f64> {
        self.data.get(indicator).copied()
    }
}
