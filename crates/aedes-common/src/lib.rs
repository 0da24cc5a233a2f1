//! aedes-common — Shared domain types, errors and configuration used across all aedes crates.

pub mod error;
pub mod entities;
pub mod catalog;
pub mod tables;
pub mod scenario;
pub mod config;

// Re-export commonly used types
pub use catalog::{IndicatorDef, IndicatorWeight, StrategyCatalog, StrategyDef};
pub use config::AedesConfig;
pub use entities::{
    Comparison, FactorChannel, Indicator, IndicatorDomain, RiskLevel, StrategyFactors,
    StrategyType, Threshold, ThresholdCondition,
};
pub use error::{AedesError, RankWarning, Result};
pub use scenario::{ScenarioProfile, StrategyFactorSet};
pub use tables::{CoefficientTable, ContextMultipliers, UrgencyTable};
