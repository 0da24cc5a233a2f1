//! aedes-ranker — multi-criteria scoring and ranking of vector-control strategies.
//!
//! Pipeline per run: threshold evaluation → weighted compliance → factor
//! score → independent min-max normalisation of both → 50/50 combination →
//! urgency (and optional context) adjustment → deterministic ranking.

pub mod compliance;
pub mod engine;
pub mod factors;
pub mod normalise;
pub mod source;
pub mod summary;
pub mod threshold;
pub mod urgency;

pub use compliance::{compliance_raw, ComplianceOutcome, ComplianceScore};
pub use engine::{
    assign_ranks, rank_order, rank_scenario, RankingEngine, RankingEntry, RankingInput,
    RankingOutcome, COMPLIANCE_WEIGHT, FACTOR_WEIGHT,
};
pub use factors::{factor_contributions, factor_score_raw, FactorContribution};
pub use normalise::{minmax_normalise, normalise_scores};
pub use source::{IndicatorSource, StaticIndicators};
pub use summary::{summarise, CriticalIndicator, IndicatorSummary};
pub use urgency::{adjust, adjust_in_context};
