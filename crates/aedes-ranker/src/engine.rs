//! Ranking engine: combines normalised compliance and factor scores,
//! applies urgency, sorts and assigns ranks.
//!
//! score(s) = (0.5 × Ĉ(s) + 0.5 × F̂(s)) × U(risk, type(s)) × X(s)
//!
//! Ĉ and F̂ are the min-max normalised compliance and factor scores over
//! the strategy set, U the urgency multiplier and X the optional context
//! multiplier (1.0 when no context is active).

use std::cmp::Ordering;

use aedes_common::{
    AedesConfig, AedesError, CoefficientTable, ContextMultipliers, RankWarning, Result, RiskLevel,
    StrategyCatalog, StrategyFactorSet, StrategyType, UrgencyTable,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::compliance::{compliance_raw, ComplianceOutcome};
use crate::factors::factor_score_raw;
use crate::normalise::minmax_normalise;
use crate::source::IndicatorSource;
use crate::summary::{summarise, IndicatorSummary};
use crate::urgency::adjust_in_context;

pub const COMPLIANCE_WEIGHT: f64 = 0.5;
pub const FACTOR_WEIGHT: f64 = 0.5;

/// Everything that varies between runs over the same catalog.
#[derive(Clone, Copy)]
pub struct RankingInput<'a> {
    pub risk_level: RiskLevel,
    pub indicators: &'a dyn IndicatorSource,
    pub factors: &'a StrategyFactorSet,
    pub context: Option<&'a ContextMultipliers>,
}

impl<'a> RankingInput<'a> {
    pub fn new(
        risk_level: RiskLevel,
        indicators: &'a dyn IndicatorSource,
        factors: &'a StrategyFactorSet,
    ) -> Self {
        Self {
            risk_level,
            indicators,
            factors,
            context: None,
        }
    }

    pub fn with_context(mut self, context: Option<&'a ContextMultipliers>) -> Self {
        self.context = context;
        self
    }
}

/// Final ranked result for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub strategy: String,
    pub strategy_type: StrategyType,
    /// 1-based; unique within a run.
    pub rank: usize,
    /// Urgency- and context-adjusted score used for ordering.
    pub score: f64,
    /// Pre-adjustment combination of the two normalised criteria.
    pub combined: f64,
    /// Normalised compliance.
    pub compliance: f64,
    pub compliance_raw: f64,
    /// Normalised factor score.
    pub factor_score: f64,
    pub factor_score_raw: f64,
}

/// Descending by score; exact ties fall back to ascending strategy id.
pub fn rank_order(a: &RankingEntry, b: &RankingEntry) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.strategy.cmp(&b.strategy))
}

/// Sort entries by `rank_order` and number them 1..=N.
pub fn assign_ranks(entries: &mut [RankingEntry]) {
    entries.sort_by(rank_order);
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingOutcome {
    pub risk_level: RiskLevel,
    /// Full ordering, rank 1 first.
    pub entries: Vec<RankingEntry>,
    pub summary: IndicatorSummary,
    #[serde(skip)]
    pub warnings: Vec<RankWarning>,
}

impl RankingOutcome {
    pub fn top(&self, k: usize) -> &[RankingEntry] {
        &self.entries[..k.min(self.entries.len())]
    }

    pub fn entry(&self, strategy: &str) -> Option<&RankingEntry> {
        self.entries.iter().find(|e| e.strategy == strategy)
    }

    /// Which of `expected` appear within the top `k`, in the order given.
    pub fn top_contains<'e>(&self, expected: &'e [String], k: usize) -> Vec<&'e str> {
        let top = self.top(k);
        expected
            .iter()
            .filter(|id| top.iter().any(|e| &e.strategy == *id))
            .map(String::as_str)
            .collect()
    }

    /// Pretty JSON report of the ranking and indicator summary.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

struct RawScores {
    compliance: ComplianceOutcome,
    factor_score: f64,
}

pub struct RankingEngine<'a> {
    catalog: &'a StrategyCatalog,
    coefficients: &'a CoefficientTable,
    urgency: &'a UrgencyTable,
}

impl<'a> RankingEngine<'a> {
    pub fn new(
        catalog: &'a StrategyCatalog,
        coefficients: &'a CoefficientTable,
        urgency: &'a UrgencyTable,
    ) -> Self {
        Self {
            catalog,
            coefficients,
            urgency,
        }
    }

    pub fn from_config(config: &'a AedesConfig) -> Self {
        Self::new(&config.catalog, &config.coefficients, &config.urgency)
    }

    /// Score and rank every strategy in the catalog.
    ///
    /// Any validation error aborts the whole run; warnings are returned on the outcome.
    pub fn rank(&self, input: &RankingInput<'_>) -> Result<RankingOutcome> {
        let strategies = &self.catalog.strategies;
        input.factors.validate(self.catalog.strategy_ids())?;

        // Per-strategy scoring is independent; collect in catalog order so the
        // first error reported is deterministic.
        let raw: Vec<RawScores> = strategies
            .par_iter()
            .map(|s| -> Result<RawScores> {
                let compliance = compliance_raw(s, self.catalog, input.indicators)?;
                let factors = input.factors.for_strategy(&s.id)?;
                let factor_score = factor_score_raw(&s.id, factors, self.coefficients)?;
                Ok(RawScores {
                    compliance,
                    factor_score,
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<_>>()?;

        let compliance_norm = minmax_normalise(
            &raw.iter().map(|r| r.compliance.score.raw).collect::<Vec<_>>(),
        );
        let factor_norm =
            minmax_normalise(&raw.iter().map(|r| r.factor_score).collect::<Vec<_>>());

        let mut entries = Vec::with_capacity(strategies.len());
        let mut warnings = Vec::new();
        for (i, (strategy, scores)) in strategies.iter().zip(raw).enumerate() {
            let combined =
                COMPLIANCE_WEIGHT * compliance_norm[i] + FACTOR_WEIGHT * factor_norm[i];
            let score = adjust_in_context(
                combined,
                &strategy.id,
                input.risk_level,
                strategy.strategy_type,
                self.urgency,
                input.context,
            )?;
            warnings.extend(scores.compliance.warnings);
            entries.push(RankingEntry {
                strategy: strategy.id.clone(),
                strategy_type: strategy.strategy_type,
                rank: 0,
                score,
                combined,
                compliance: compliance_norm[i],
                compliance_raw: scores.compliance.score.raw,
                factor_score: factor_norm[i],
                factor_score_raw: scores.factor_score,
            });
        }

        assign_ranks(&mut entries);
        let summary = summarise(self.catalog, input.indicators);

        tracing::debug!(
            risk_level = %input.risk_level,
            strategies = entries.len(),
            critical = summary.critical,
            normal = summary.normal,
            warnings = warnings.len(),
            top = entries.first().map(|e| e.strategy.as_str()).unwrap_or("-"),
            "ranking complete"
        );

        Ok(RankingOutcome {
            risk_level: input.risk_level,
            entries,
            summary,
            warnings,
        })
    }
}

/// Rank a preset scenario from `config`, applying its context if it names one.
pub fn rank_scenario(config: &AedesConfig, scenario_id: &str) -> Result<RankingOutcome> {
    let scenario = config
        .scenario(scenario_id)
        .ok_or_else(|| AedesError::Config(format!("unknown scenario '{scenario_id}'")))?;

    let context = match &scenario.context {
        Some(name) => Some(config.context(name).ok_or_else(|| {
            AedesError::Config(format!(
                "scenario '{scenario_id}' references unknown context '{name}'"
            ))
        })?),
        None => None,
    };

    let factors = scenario.factor_set();
    let input = RankingInput::new(scenario.risk_level()?, &scenario.indicators, &factors)
        .with_context(context);
    RankingEngine::from_config(config).rank(&input)
}
