//! Core domain types shared by the configuration layer and the ranker.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AedesError, Result};

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorDomain {
    #[serde(alias = "epidemiologico")]
    Epidemiological,
    #[serde(alias = "entomologico")]
    Entomological,
    #[serde(alias = "operativo")]
    Operational,
    #[serde(alias = "cobertura")]
    Coverage,
    #[serde(alias = "tiempos")]
    Timing,
    #[serde(alias = "ambiental")]
    Environmental,
    Social,
}

/// A single indicator reading for one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub name: String,
    pub value: f64,
    pub domain: IndicatorDomain,
}

// ---------------------------------------------------------------------------
// Threshold conditions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=", alias = "≤")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=", alias = "≥")]
    Ge,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }

    /// True for `>` and `>=`: the condition fires when the value rises.
    pub fn is_upper(&self) -> bool {
        matches!(self, Comparison::Gt | Comparison::Ge)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparison {
    type Err = AedesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "<" => Ok(Comparison::Lt),
            "<=" | "≤" => Ok(Comparison::Le),
            ">" => Ok(Comparison::Gt),
            ">=" | "≥" => Ok(Comparison::Ge),
            other => Err(AedesError::InvalidThreshold(format!("unsupported operator '{other}'"))),
        }
    }
}

/// Operator and value of a threshold, without the indicator it belongs to.
///
/// Deserializes either from a structured `{ op, value }` map or from the
/// free-text form used in consensus sheets, e.g. `"< 70%"`, `"> 3 casos/barrio"`,
/// `"Tipo II (≥ 6 semanas)"`. A bare number means `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ThresholdRepr")]
pub struct Threshold {
    pub op: Comparison,
    pub value: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ThresholdRepr {
    Structured { op: Comparison, value: f64 },
    Number(f64),
    Text(String),
}

impl TryFrom<ThresholdRepr> for Threshold {
    type Error = AedesError;

    fn try_from(repr: ThresholdRepr) -> Result<Self> {
        match repr {
            ThresholdRepr::Structured { op, value } => Threshold::new(op, value),
            ThresholdRepr::Number(value) => Threshold::new(Comparison::Ge, value),
            ThresholdRepr::Text(text) => text.parse(),
        }
    }
}

impl Threshold {
    pub fn new(op: Comparison, value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(AedesError::InvalidThreshold(format!("non-finite threshold {value}")));
        }
        Ok(Self { op, value })
    }
}

fn operator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([<>])\s*(=?)\s*(-?\d+(?:\.\d+)?)").expect("static regex"))
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("static regex"))
}

impl FromStr for Threshold {
    type Err = AedesError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim().replace('≤', "<=").replace('≥', ">=");
        if text.is_empty() {
            return Err(AedesError::InvalidThreshold("empty threshold".to_string()));
        }

        if let Some(caps) = operator_regex().captures(&text) {
            let op = format!("{}{}", &caps[1], &caps[2]).parse()?;
            let value = caps[3]
                .parse::<f64>()
                .map_err(|e| AedesError::InvalidThreshold(format!("'{s}': {e}")))?;
            return Threshold::new(op, value);
        }

        match number_regex().find(&text) {
            Some(m) => {
                let value = m
                    .as_str()
                    .parse::<f64>()
                    .map_err(|e| AedesError::InvalidThreshold(format!("'{s}': {e}")))?;
                Threshold::new(Comparison::Ge, value)
            }
            None => Err(AedesError::InvalidThreshold(format!("no operator or number in '{s}'"))),
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.value)
    }
}

/// The condition under which an indicator is considered critical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCondition {
    pub indicator: String,
    pub op: Comparison,
    pub threshold: f64,
}

impl ThresholdCondition {
    pub fn new(indicator: impl Into<String>, op: Comparison, threshold: f64) -> Self {
        Self {
            indicator: indicator.into(),
            op,
            threshold,
        }
    }
}

impl fmt::Display for ThresholdCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.indicator, self.op, self.threshold)
    }
}

// ---------------------------------------------------------------------------
// Strategy type / risk level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    #[serde(alias = "inmediata")]
    Immediate,
    #[serde(alias = "activa")]
    Active,
    #[serde(alias = "preventiva")]
    Preventive,
    #[serde(alias = "coordinacion")]
    Coordination,
    #[serde(alias = "monitoreo")]
    Monitoring,
}

impl StrategyType {
    pub const ALL: [StrategyType; 5] = [
        StrategyType::Immediate,
        StrategyType::Active,
        StrategyType::Preventive,
        StrategyType::Coordination,
        StrategyType::Monitoring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyType::Immediate => "immediate",
            StrategyType::Active => "active",
            StrategyType::Preventive => "preventive",
            StrategyType::Coordination => "coordination",
            StrategyType::Monitoring => "monitoring",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[serde(alias = "bajo_riesgo")]
    Low,
    #[serde(alias = "riesgo_moderado")]
    Moderate,
    #[serde(alias = "alto_riesgo")]
    High,
    #[serde(alias = "emergencia")]
    Emergency,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::Emergency,
    ];

    /// Map a 1-based alert level (1 = low … 4 = emergency).
    pub fn from_alert_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(RiskLevel::Low),
            2 => Some(RiskLevel::Moderate),
            3 => Some(RiskLevel::High),
            4 => Some(RiskLevel::Emergency),
            _ => None,
        }
    }

    pub fn alert_level(&self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Moderate => 2,
            RiskLevel::High => 3,
            RiskLevel::Emergency => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Emergency => "emergency",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Factor channels
// ---------------------------------------------------------------------------

/// The 11 applicability factor channels, each scored 0–10 per strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorChannel {
    #[serde(alias = "disponibilidad_recursos")]
    ResourceAvailability,
    #[serde(alias = "costo_operativo")]
    OperatingCost,
    #[serde(alias = "tiempo_cobertura")]
    TimeToCoverage,
    #[serde(alias = "dependencias_externas")]
    ExternalDependencies,
    #[serde(alias = "aceptacion_comunidad")]
    CommunityAcceptance,
    #[serde(alias = "acceso_predios")]
    PropertyAccess,
    #[serde(alias = "percepcion_riesgo")]
    RiskPerception,
    #[serde(alias = "resistencia_vector")]
    VectorResistance,
    #[serde(alias = "otros_vectores")]
    OtherFoci,
    #[serde(alias = "efectividad_esperada")]
    ExpectedEffectiveness,
    #[serde(alias = "magnitud_brote")]
    OutbreakMagnitude,
}

impl FactorChannel {
    pub const COUNT: usize = 11;

    pub const ALL: [FactorChannel; FactorChannel::COUNT] = [
        FactorChannel::ResourceAvailability,
        FactorChannel::OperatingCost,
        FactorChannel::TimeToCoverage,
        FactorChannel::ExternalDependencies,
        FactorChannel::CommunityAcceptance,
        FactorChannel::PropertyAccess,
        FactorChannel::RiskPerception,
        FactorChannel::VectorResistance,
        FactorChannel::OtherFoci,
        FactorChannel::ExpectedEffectiveness,
        FactorChannel::OutbreakMagnitude,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FactorChannel::ResourceAvailability => "resource_availability",
            FactorChannel::OperatingCost => "operating_cost",
            FactorChannel::TimeToCoverage => "time_to_coverage",
            FactorChannel::ExternalDependencies => "external_dependencies",
            FactorChannel::CommunityAcceptance => "community_acceptance",
            FactorChannel::PropertyAccess => "property_access",
            FactorChannel::RiskPerception => "risk_perception",
            FactorChannel::VectorResistance => "vector_resistance",
            FactorChannel::OtherFoci => "other_foci",
            FactorChannel::ExpectedEffectiveness => "expected_effectiveness",
            FactorChannel::OutbreakMagnitude => "outbreak_magnitude",
        }
    }
}

impl fmt::Display for FactorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const FACTOR_MIN: f64 = 0.0;
pub const FACTOR_MAX: f64 = 10.0;

/// Applicability factor vector of one strategy.
/// Every channel must be present when deserializing; range is checked at scoring time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<FactorChannel, f64>",
    into = "BTreeMap<FactorChannel, f64>"
)]
pub struct StrategyFactors {
    values: [f64; FactorChannel::COUNT],
}

impl StrategyFactors {
    pub fn new(values: [f64; FactorChannel::COUNT]) -> Self {
        Self { values }
    }

    /// Same value on every channel.
    pub fn uniform(value: f64) -> Self {
        Self {
            values: [value; FactorChannel::COUNT],
        }
    }

    pub fn with(mut self, channel: FactorChannel, value: f64) -> Self {
        self.values[channel.index()] = value;
        self
    }

    pub fn get(&self, channel: FactorChannel) -> f64 {
        self.values[channel.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (FactorChannel, f64)> + '_ {
        FactorChannel::ALL.iter().map(move |c| (*c, self.values[c.index()]))
    }

    /// Fail with `InvalidFactorValue` on the first channel outside [0, 10] (NaN included).
    pub fn validate(&self, strategy: &str) -> Result<()> {
        for (channel, value) in self.iter() {
            if !(FACTOR_MIN..=FACTOR_MAX).contains(&value) {
                return Err(AedesError::InvalidFactorValue {
                    strategy: strategy.to_string(),
                    channel,
                    value,
                });
            }
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<FactorChannel, f64>> for StrategyFactors {
    type Error = AedesError;

    fn try_from(map: BTreeMap<FactorChannel, f64>) -> Result<Self> {
        let mut values = [0.0; FactorChannel::COUNT];
        for channel in FactorChannel::ALL {
            values[channel.index()] = *map.get(&channel).ok_or_else(|| {
                AedesError::Config(format!("factor vector is missing channel '{channel}'"))
            })?;
        }
        Ok(Self { values })
    }
}

impl From<StrategyFactors> for BTreeMap<FactorChannel, f64> {
    fn from(factors: StrategyFactors) -> Self {
        factors.iter().collect()
    }
}
