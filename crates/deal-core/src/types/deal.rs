//! Deal records.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A cleaned sales opportunity, one per row of the prepared dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRecord {
    /// Stable deal identifier
    pub deal_id: String,
    /// Pipeline stage label
    pub deal_stage: String,
    /// Normalized (trimmed, lower-cased) outcome
    pub outcome: String,
    /// Whether the normalized outcome is "won"
    pub is_won: bool,
    /// Creation timestamp, if present and parseable
    pub created_date: Option<NaiveDateTime>,
    /// Close timestamp, if present and parseable
    pub closed_date: Option<NaiveDateTime>,
    /// Whole days between creation and close; `None` when either date is missing
    pub sales_cycle_days: Option<i64>,
    /// Deal value, passed through unchanged; `None` when the cell was blank
    pub deal_amount: Option<Decimal>,
}

impl DealRecord {
    /// Create a record from the fields the scoring engine reads.
    pub fn new(
        deal_id: impl Into<String>,
        deal_stage: impl Into<String>,
        is_won: bool,
        sales_cycle_days: Option<i64>,
        deal_amount: Decimal,
    ) -> Self {
        Self {
            deal_id: deal_id.into(),
            deal_stage: deal_stage.into(),
            outcome: if is_won { "won".to_string() } else { "lost".to_string() },
            is_won,
            created_date: None,
            closed_date: None,
            sales_cycle_days,
            deal_amount: Some(deal_amount),
        }
    }

    /// Create a record from a raw outcome and raw dates, deriving `is_won`
    /// and `sales_cycle_days`.
    pub fn from_raw(
        deal_id: impl Into<String>,
        deal_stage: impl Into<String>,
        raw_outcome: &str,
        created_date: Option<NaiveDateTime>,
        closed_date: Option<NaiveDateTime>,
        deal_amount: Option<Decimal>,
    ) -> Self {
        let outcome = normalize_outcome(raw_outcome);
        let is_won = outcome == "won";
        Self {
            deal_id: deal_id.into(),
            deal_stage: deal_stage.into(),
            outcome,
            is_won,
            created_date,
            closed_date,
            sales_cycle_days: cycle_days(created_date, closed_date),
            deal_amount,
        }
    }

    /// Check whether the sales cycle is known.
    #[inline]
    pub fn has_cycle(&self) -> bool {
        self.sales_cycle_days.is_some()
    }
}

/// Trim and lower-case a raw outcome label.
fn normalize_outcome(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whole days from `created` to `closed`, floored toward negative infinity.
fn cycle_days(created: Option<NaiveDateTime>, closed: Option<NaiveDateTime>) -> Option<i64> {
    let (created, closed) = (created?, closed?);
    Some((closed - created).num_seconds().div_euclid(86_400))
}
