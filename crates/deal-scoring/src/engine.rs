//! Deal risk engine.

use deal_core::error::ScoringError;
use deal_core::types::{DealRecord, RiskSignals, ScoredDeal};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use crate::{median_cycle_days, stagnation_flag, CycleRange, RiskReport, StageLossTable};

/// Stage risk assigned to a stage with no history under [`UnknownStagePolicy::Neutral`].
pub const NEUTRAL_STAGE_RISK: f64 = 0.5;

/// How to treat deals whose sales cycle is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDatePolicy {
    /// Leave the deal out of scoring and output
    #[default]
    Exclude,
    /// Score the deal with full cycle and stagnation risk
    MaxRisk,
}

/// How to treat a deal whose stage has no historical records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownStagePolicy {
    /// Assign [`NEUTRAL_STAGE_RISK`]
    #[default]
    Neutral,
    /// Fail with [`ScoringError::UnknownStage`]
    Reject,
}

/// Scoring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    /// Weight of the normalized cycle length
    pub cycle_weight: f64,
    /// Weight of the stagnation flag
    pub stagnation_weight: f64,
    /// Weight of the stage loss rate
    pub stage_weight: f64,
    /// Stagnation day threshold; the dataset median when unset
    pub stagnation_threshold: Option<f64>,
    /// Number of deals to return
    pub top_n: usize,
    pub missing_dates: MissingDatePolicy,
    pub unknown_stage: UnknownStagePolicy,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            cycle_weight: 0.4,
            stagnation_weight: 0.3,
            stage_weight: 0.3,
            stagnation_threshold: None,
            top_n: 10,
            missing_dates: MissingDatePolicy::Exclude,
            unknown_stage: UnknownStagePolicy::Neutral,
        }
    }
}

impl ScoringParams {
    /// Check parameters. Weights may be zero or negative but must be finite.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.top_n == 0 {
            return Err(ScoringError::InvalidTopN(self.top_n));
        }

        let weights = [
            ("cycle_weight", self.cycle_weight),
            ("stagnation_weight", self.stagnation_weight),
            ("stage_weight", self.stage_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() {
                return Err(ScoringError::InvalidParameter(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        if let Some(threshold) = self.stagnation_threshold {
            if !threshold.is_finite() {
                return Err(ScoringError::InvalidParameter(format!(
                    "stagnation_threshold must be finite, got {threshold}"
                )));
            }
        }

        Ok(())
    }

    /// Weighted sum of the three signals.
    #[inline]
    pub fn combine(&self, signals: &RiskSignals) -> f64 {
        self.cycle_weight * signals.cycle_risk
            + self.stagnation_weight * signals.stagnation_risk
            + self.stage_weight * signals.stage_risk
    }
}

/// Scores and ranks deals by closure risk.
///
/// Normalization bounds, the default stagnation threshold and stage loss
/// rates are all recomputed from the dataset passed to each call.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    params: ScoringParams,
}

impl RiskEngine {
    /// Create a new risk engine.
    pub fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    /// Score deals using stage loss rates from the same dataset.
    pub fn score(&self, deals: &[DealRecord]) -> Result<RiskReport, ScoringError> {
        if deals.is_empty() {
            return Err(ScoringError::EmptyDataset);
        }
        let table = StageLossTable::from_deals(deals);
        self.score_with_stage_table(deals, &table)
    }

    /// Score deals against precomputed stage loss rates.
    pub fn score_with_stage_table(
        &self,
        deals: &[DealRecord],
        stages: &StageLossTable,
    ) -> Result<RiskReport, ScoringError> {
        self.params.validate()?;
        if deals.is_empty() {
            return Err(ScoringError::EmptyDataset);
        }

        let universe: Vec<&DealRecord> = match self.params.missing_dates {
            MissingDatePolicy::Exclude => deals.iter().filter(|d| d.has_cycle()).collect(),
            MissingDatePolicy::MaxRisk => deals.iter().collect(),
        };
        let excluded = deals.len() - universe.len();
        if excluded > 0 {
            warn!(excluded, "Excluding deals without a sales cycle from scoring");
        }
        if universe.is_empty() {
            return Err(ScoringError::EmptyDataset);
        }

        let cycle_days: Vec<i64> = universe.iter().filter_map(|d| d.sales_cycle_days).collect();
        let cycle_range = CycleRange::from_days(&cycle_days);
        let threshold = self
            .params
            .stagnation_threshold
            .or_else(|| median_cycle_days(&cycle_days));

        if let Some(range) = cycle_range.filter(CycleRange::is_degenerate) {
            debug!(days = range.min, "All sales cycles are equal; cycle risk is zero");
        }
        debug!(?cycle_range, ?threshold, stages = stages.len(), "Resolved scoring statistics");

        let mut scored = Vec::with_capacity(universe.len());
        for deal in universe {
            let signals = self.signals(deal, cycle_range, threshold, stages)?;
            scored.push(ScoredDeal {
                deal_id: deal.deal_id.clone(),
                deal_stage: deal.deal_stage.clone(),
                sales_cycle_days: deal.sales_cycle_days,
                deal_amount: deal.deal_amount,
                deal_risk_score: self.params.combine(&signals),
                signals,
            });
        }

        // Stable: equal scores keep input order.
        scored.sort_by(|a, b| {
            b.deal_risk_score
                .partial_cmp(&a.deal_risk_score)
                .unwrap_or(Ordering::Equal)
        });
        let scored_count = scored.len();
        scored.truncate(self.params.top_n);

        info!(
            scored = scored_count,
            returned = scored.len(),
            excluded,
            "Scored deals"
        );

        Ok(RiskReport {
            params: self.params.clone(),
            dataset_size: deals.len(),
            scored_count,
            excluded,
            cycle_range,
            stagnation_threshold: threshold,
            deals: scored,
        })
    }

    fn signals(
        &self,
        deal: &DealRecord,
        cycle_range: Option<CycleRange>,
        threshold: Option<f64>,
        stages: &StageLossTable,
    ) -> Result<RiskSignals, ScoringError> {
        let stage_risk = match stages.loss_rate(&deal.deal_stage) {
            Some(rate) => rate,
            None => match self.params.unknown_stage {
                UnknownStagePolicy::Neutral => {
                    debug!(stage = %deal.deal_stage, "Stage has no history; using neutral risk");
                    NEUTRAL_STAGE_RISK
                }
                UnknownStagePolicy::Reject => {
                    return Err(ScoringError::UnknownStage(deal.deal_stage.clone()));
                }
            },
        };

        let (cycle_risk, stagnation_risk) = match deal.sales_cycle_days {
            Some(days) => (
                cycle_range.map_or(0.0, |range| range.normalize(days)),
                threshold.map_or(0.0, |t| stagnation_flag(days, t)),
            ),
            None => (1.0, 1.0),
        };

        Ok(RiskSignals {
            cycle_risk,
            stagnation_risk,
            stage_risk,
        })
    }
}

/// Rank deals by risk and return the `top_n` riskiest.
pub fn score_deals(
    deals: &[DealRecord],
    params: &ScoringParams,
) -> Result<Vec<ScoredDeal>, ScoringError> {
    RiskEngine::new(params.clone())
        .score(deals)
        .map(|report| report.deals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn deal(id: &str, stage: &str, won: bool, days: Option<i64>) -> DealRecord {
        DealRecord::new(id, stage, won, days, dec!(1000))
    }

    fn three_deals() -> Vec<DealRecord> {
        vec![
            deal("d10", "A", true, Some(10)),
            deal("d20", "A", false, Some(20)),
            deal("d30", "B", false, Some(30)),
        ]
    }

    fn params(threshold: Option<f64>, top_n: usize) -> ScoringParams {
        ScoringParams {
            stagnation_threshold: threshold,
            top_n,
            ..Default::default()
        }
    }

    fn ids(deals: &[ScoredDeal]) -> Vec<&str> {
        deals.iter().map(|d| d.deal_id.as_str()).collect()
    }

    #[test]
    fn test_three_deal_ranking() {
        let ranked = score_deals(&three_deals(), &params(Some(15.0), 3)).unwrap();

        assert_eq!(ids(&ranked), vec!["d30", "d20", "d10"]);
        assert!((ranked[0].deal_risk_score - 1.0).abs() < 1e-9);
        assert!((ranked[1].deal_risk_score - 0.65).abs() < 1e-9);
        assert!((ranked[2].deal_risk_score - 0.15).abs() < 1e-9);

        assert_eq!(ranked[0].signals.stage_risk, 1.0);
        assert_eq!(ranked[2].signals.stage_risk, 0.5);
    }

    #[test]
    fn test_output_projection() {
        let ranked = score_deals(&three_deals(), &params(Some(15.0), 1)).unwrap();
        let top = &ranked[0];
        assert_eq!(top.deal_id, "d30");
        assert_eq!(top.deal_stage, "B");
        assert_eq!(top.sales_cycle_days, Some(30));
        assert_eq!(top.deal_amount, Some(dec!(1000)));
    }

    #[test]
    fn test_top_n_truncates_and_saturates() {
        let deals = three_deals();
        assert_eq!(score_deals(&deals, &params(None, 2)).unwrap().len(), 2);
        assert_eq!(score_deals(&deals, &params(None, 50)).unwrap().len(), 3);
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let err = score_deals(&three_deals(), &params(None, 0)).unwrap_err();
        assert_eq!(err, ScoringError::InvalidTopN(0));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = score_deals(&[], &ScoringParams::default()).unwrap_err();
        assert_eq!(err, ScoringError::EmptyDataset);
    }

    #[test]
    fn test_non_finite_weight_rejected() {
        let params = ScoringParams {
            stage_weight: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            score_deals(&three_deals(), &params),
            Err(ScoringError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_default_threshold_is_median() {
        let report = RiskEngine::new(params(None, 10)).score(&three_deals()).unwrap();
        assert_eq!(report.stagnation_threshold, Some(20.0));

        for scored in &report.deals {
            let expected = if scored.sales_cycle_days.unwrap() > 20 { 1.0 } else { 0.0 };
            assert_eq!(scored.signals.stagnation_risk, expected);
        }
    }

    #[test]
    fn test_zero_threshold_marks_positive_cycles() {
        let deals = vec![
            deal("a", "A", false, Some(0)),
            deal("b", "A", false, Some(1)),
            deal("c", "A", false, Some(45)),
        ];
        let ranked = score_deals(&deals, &params(Some(0.0), 10)).unwrap();
        for scored in &ranked {
            let expected = if scored.sales_cycle_days.unwrap() > 0 { 1.0 } else { 0.0 };
            assert_eq!(scored.signals.stagnation_risk, expected);
        }
    }

    #[test]
    fn test_cycle_risk_bounds() {
        let deals: Vec<DealRecord> = (0..20)
            .map(|i| deal(&format!("d{i}"), "A", i % 3 == 0, Some(i * 7 - 10)))
            .collect();
        let ranked = score_deals(&deals, &params(None, 100)).unwrap();
        assert!(ranked
            .iter()
            .all(|d| (0.0..=1.0).contains(&d.signals.cycle_risk)));
        assert!(ranked.iter().any(|d| d.signals.cycle_risk == 0.0));
        assert!(ranked.iter().any(|d| d.signals.cycle_risk == 1.0));
    }

    #[test]
    fn test_degenerate_range() {
        let deals = vec![
            deal("a", "A", true, Some(12)),
            deal("b", "B", false, Some(12)),
        ];
        let report = RiskEngine::new(params(None, 10)).score(&deals).unwrap();
        assert!(report.deals.iter().all(|d| d.signals.cycle_risk == 0.0));
        assert!(report.deals.iter().all(|d| d.deal_risk_score.is_finite()));
        assert_eq!(report.deals[0].deal_id, "b");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let deals = vec![
            deal("first", "A", false, Some(10)),
            deal("second", "A", false, Some(10)),
            deal("third", "A", false, Some(10)),
        ];
        let ranked = score_deals(&deals, &params(None, 10)).unwrap();
        assert_eq!(ids(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_idempotent() {
        let deals = three_deals();
        let p = params(Some(15.0), 3);
        assert_eq!(score_deals(&deals, &p).unwrap(), score_deals(&deals, &p).unwrap());
    }

    #[test]
    fn test_input_untouched() {
        let deals = three_deals();
        let before = deals.clone();
        let _ = score_deals(&deals, &ScoringParams::default()).unwrap();
        assert_eq!(deals, before);
    }

    #[test]
    fn test_missing_dates_excluded_by_default() {
        let deals = vec![
            deal("a", "A", true, Some(10)),
            deal("b", "A", false, None),
            deal("c", "A", false, Some(30)),
        ];
        let report = RiskEngine::new(params(None, 10)).score(&deals).unwrap();
        assert_eq!(report.excluded, 1);
        assert_eq!(report.scored_count, 2);
        assert_eq!(ids(&report.deals), vec!["c", "a"]);
        // Outcomes of excluded rows still count toward stage loss rates.
        assert!((report.deals[0].signals.stage_risk - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_dates_max_risk() {
        let deals = vec![
            deal("a", "A", true, Some(10)),
            deal("b", "A", true, None),
            deal("c", "A", true, Some(30)),
        ];
        let p = ScoringParams {
            missing_dates: MissingDatePolicy::MaxRisk,
            ..params(None, 10)
        };
        let report = RiskEngine::new(p).score(&deals).unwrap();
        assert_eq!(report.excluded, 0);
        assert_eq!(report.stagnation_threshold, Some(20.0));

        let undefined = report.deals.iter().find(|d| d.deal_id == "b").unwrap();
        assert_eq!(undefined.signals.cycle_risk, 1.0);
        assert_eq!(undefined.signals.stagnation_risk, 1.0);
    }

    #[test]
    fn test_all_dates_missing_excluded_is_empty() {
        let deals = vec![deal("a", "A", true, None)];
        let err = RiskEngine::new(params(None, 10)).score(&deals).unwrap_err();
        assert_eq!(err, ScoringError::EmptyDataset);
    }

    #[test]
    fn test_unknown_stage_neutral() {
        let history = StageLossTable::from_deals(&[deal("h", "A", true, Some(5))]);
        let report = RiskEngine::new(params(None, 10))
            .score_with_stage_table(&[deal("x", "Z", false, Some(5))], &history)
            .unwrap();
        assert_eq!(report.deals[0].signals.stage_risk, NEUTRAL_STAGE_RISK);
    }

    #[test]
    fn test_unknown_stage_reject() {
        let history = StageLossTable::from_deals(&[deal("h", "A", true, Some(5))]);
        let p = ScoringParams {
            unknown_stage: UnknownStagePolicy::Reject,
            ..Default::default()
        };
        let err = RiskEngine::new(p)
            .score_with_stage_table(&[deal("x", "Z", false, Some(5))], &history)
            .unwrap_err();
        assert_eq!(err, ScoringError::UnknownStage("Z".to_string()));
    }

    #[test]
    fn test_zero_weights_disable_signals() {
        let p = ScoringParams {
            cycle_weight: 0.0,
            stagnation_weight: 0.0,
            stage_weight: 1.0,
            ..params(None, 10)
        };
        let ranked = score_deals(&three_deals(), &p).unwrap();
        for scored in &ranked {
            assert_eq!(scored.deal_risk_score, scored.signals.stage_risk);
        }
        assert_eq!(ranked[0].deal_amount, Some(Decimal::from(1000)));
    }
}
