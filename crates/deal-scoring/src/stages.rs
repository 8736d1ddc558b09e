//! Historical stage loss rates.

use deal_core::types::DealRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Won and total counts for a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageStats {
    pub total: usize,
    pub won: usize,
}

impl StageStats {
    /// Fraction of deals in the stage that closed as won.
    pub fn win_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.won as f64 / self.total as f64
    }

    /// Fraction of deals in the stage that did not close as won.
    pub fn loss_rate(&self) -> f64 {
        1.0 - self.win_rate()
    }
}

/// Per-stage outcome counts used for the stage risk signal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StageLossTable {
    stages: BTreeMap<String, StageStats>,
}

impl StageLossTable {
    /// Group deals by stage and count outcomes.
    pub fn from_deals(deals: &[DealRecord]) -> Self {
        let mut stages: BTreeMap<String, StageStats> = BTreeMap::new();
        for deal in deals {
            let stats = stages.entry(deal.deal_stage.clone()).or_default();
            stats.total += 1;
            if deal.is_won {
                stats.won += 1;
            }
        }
        Self { stages }
    }

    /// Loss rate for a stage, or `None` if the stage has no history.
    pub fn loss_rate(&self, stage: &str) -> Option<f64> {
        self.stages
            .get(stage)
            .filter(|stats| stats.total > 0)
            .map(StageStats::loss_rate)
    }

    /// Iterate stages in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StageStats)> {
        self.stages.iter().map(|(name, stats)| (name.as_str(), stats))
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("STAGE LOSS RATES\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  {:<24} {:>8} {:>8} {:>10}\n",
            "Stage", "Deals", "Won", "Loss Rate"
        ));
        for (name, stats) in self.iter() {
            s.push_str(&format!(
                "  {:<24} {:>8} {:>8} {:>9.1}%\n",
                name,
                stats.total,
                stats.won,
                stats.loss_rate() * 100.0
            ));
        }

        s
    }
}
