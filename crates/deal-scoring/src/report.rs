//! Risk report generation.

use deal_core::types::ScoredDeal;
use serde::{Deserialize, Serialize};

use crate::{CycleRange, ScoringParams};

/// Ranked deals together with the statistics they were scored against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Parameters used
    pub params: ScoringParams,
    /// Rows passed to the engine
    pub dataset_size: usize,
    /// Rows that received a score
    pub scored_count: usize,
    /// Rows left out because their sales cycle was undefined
    pub excluded: usize,
    /// Cycle bounds used for normalization
    pub cycle_range: Option<CycleRange>,
    /// Resolved stagnation threshold in days
    pub stagnation_threshold: Option<f64>,
    /// Riskiest deals, highest score first
    pub deals: Vec<ScoredDeal>,
}

impl RiskReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        self.render(false)
    }

    /// Generate a text summary including each deal's signal breakdown.
    pub fn explained_summary(&self) -> String {
        self.render(true)
    }

    fn render(&self, explain: bool) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     DEAL RISK REPORT                       \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("PARAMETERS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Cycle Weight:        {:.2}\n",
            self.params.cycle_weight
        ));
        s.push_str(&format!(
            "  Stagnation Weight:   {:.2}\n",
            self.params.stagnation_weight
        ));
        s.push_str(&format!(
            "  Stage Weight:        {:.2}\n",
            self.params.stage_weight
        ));
        let source = if self.params.stagnation_threshold.is_some() {
            "explicit"
        } else {
            "median"
        };
        match self.stagnation_threshold {
            Some(threshold) => s.push_str(&format!(
                "  Stagnation After:    {:.1} days ({})\n",
                threshold, source
            )),
            None => s.push_str("  Stagnation After:    n/a\n"),
        }
        s.push('\n');

        s.push_str("DATASET\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Deals Loaded:        {}\n", self.dataset_size));
        s.push_str(&format!("  Deals Scored:        {}\n", self.scored_count));
        s.push_str(&format!("  Deals Excluded:      {}\n", self.excluded));
        if let Some(range) = self.cycle_range {
            s.push_str(&format!(
                "  Cycle Range:         {} to {} days\n",
                range.min, range.max
            ));
        }
        s.push('\n');

        s.push_str(&format!("TOP {} RISKIEST DEALS\n", self.deals.len()));
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  {:>4}  {:<12} {:<16} {:>6} {:>14} {:>7}",
            "Rank", "Deal", "Stage", "Days", "Amount", "Score"
        ));
        if explain {
            s.push_str(&format!(" {:>6} {:>6} {:>6}", "Cycle", "Stag", "Stage"));
        }
        s.push('\n');

        for (rank, deal) in self.deals.iter().enumerate() {
            let days = deal
                .sales_cycle_days
                .map_or_else(|| "-".to_string(), |d| d.to_string());
            let amount = deal
                .deal_amount
                .map_or_else(|| "-".to_string(), |a| format!("{:.2}", a));
            s.push_str(&format!(
                "  {:>4}  {:<12} {:<16} {:>6} {:>14} {:>7.4}",
                rank + 1,
                deal.deal_id,
                deal.deal_stage,
                days,
                amount,
                deal.deal_risk_score
            ));
            if explain {
                s.push_str(&format!(
                    " {:>6.3} {:>6.0} {:>6.3}",
                    deal.signals.cycle_risk, deal.signals.stagnation_risk, deal.signals.stage_risk
                ));
            }
            s.push('\n');
        }
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export the ranked deals to CSV.
    pub fn to_csv(&self) -> Result<String, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for deal in &self.deals {
            writer.serialize(deal)?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
