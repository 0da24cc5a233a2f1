use std::fmt;

use thiserror::Error;

use crate::entities::{FactorChannel, RiskLevel, StrategyType};

#[derive(Debug, Error)]
pub enum AedesError {
    #[error("Missing indicator value: {indicator}")]
    MissingIndicator { indicator: String },

    #[error("Invalid factor value for strategy '{strategy}': {channel} = {value} (expected 0..=10)")]
    InvalidFactorValue {
        strategy: String,
        channel: FactorChannel,
        value: f64,
    },

    #[error("No urgency multiplier for strategy type '{strategy_type}' at risk level '{risk_level}'")]
    UnknownStrategyType {
        risk_level: RiskLevel,
        strategy_type: StrategyType,
    },

    #[error("No factor vector supplied for strategy '{strategy}'")]
    MissingFactors { strategy: String },

    #[error("Strategy '{strategy}' references undeclared indicator '{indicator}'")]
    UnknownIndicator { strategy: String, indicator: String },

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Duplicate strategy: {0}")]
    DuplicateStrategy(String),

    #[error("Duplicate indicator: {0}")]
    DuplicateIndicator(String),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("Invalid weight for '{indicator}' in strategy '{strategy}': {weight}")]
    InvalidWeight {
        strategy: String,
        indicator: String,
        weight: f64,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AedesError>;

/// Non-fatal conditions raised during a ranking run.
/// They are collected on the outcome and the run proceeds.
#[derive(Debug, Clone, PartialEq)]
pub enum RankWarning {
    /// Weights of a strategy do not sum to 1.0 within tolerance; the raw sum is used as-is.
    MalformedWeights { strategy: String, sum: f64 },
    /// Strategy has no associated indicators; its compliance is 0.0.
    NoIndicators { strategy: String },
}

impl RankWarning {
    pub fn strategy(&self) -> &str {
        match self {
            RankWarning::MalformedWeights { strategy, .. } => strategy,
            RankWarning::NoIndicators { strategy } => strategy,
        }
    }
}

impl fmt::Display for RankWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankWarning::MalformedWeights { strategy, sum } => {
                write!(f, "weights of '{strategy}' sum to {sum:.4}, expected 1.0")
            }
            RankWarning::NoIndicators { strategy } => {
                write!(f, "strategy '{strategy}' has no indicators; compliance set to 0.0")
            }
        }
    }
}
