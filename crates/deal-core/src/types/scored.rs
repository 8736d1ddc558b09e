//! Scored deal output rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-signal breakdown behind a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskSignals {
    /// Min-max normalized cycle length, in [0, 1]
    pub cycle_risk: f64,
    /// 1.0 when the cycle exceeds the stagnation threshold, else 0.0
    pub stagnation_risk: f64,
    /// Historical loss rate of the deal's stage, in [0, 1]
    pub stage_risk: f64,
}

/// A deal projected to the ranked output columns.
///
/// The signal breakdown travels with the row but is not part of the
/// serialized projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDeal {
    pub deal_id: String,
    pub deal_stage: String,
    pub sales_cycle_days: Option<i64>,
    pub deal_amount: Option<Decimal>,
    pub deal_risk_score: f64,
    #[serde(skip)]
    pub signals: RiskSignals,
}
