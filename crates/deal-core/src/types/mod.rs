//! Core domain types.

mod deal;
mod scored;

pub use deal::DealRecord;
pub use scored::{RiskSignals, ScoredDeal};
