//! Deal risk scoring.
//!
//! Combines three per-deal signals into a weighted risk score:
//! - cycle risk: min-max normalized sales cycle length
//! - stagnation risk: cycle length above a day threshold
//! - stage risk: historical loss rate of the deal's stage

mod engine;
mod report;
mod signals;
mod stages;

pub use engine::{
    score_deals, MissingDatePolicy, RiskEngine, ScoringParams, UnknownStagePolicy,
    NEUTRAL_STAGE_RISK,
};
pub use report::RiskReport;
pub use signals::{median_cycle_days, stagnation_flag, CycleRange};
pub use stages::{StageLossTable, StageStats};
