//! Score command implementation.

use anyhow::{Context, Result};
use deal_config::AppConfig;
use deal_scoring::{RiskEngine, ScoringParams, StageLossTable};
use tracing::info;

use super::{load_deals, resolve_path};
use crate::cli::{OutputFormat, ScoreArgs};

pub fn run(args: ScoreArgs, config: &AppConfig) -> Result<()> {
    let data_path = resolve_path(args.data.clone(), config.data.path.as_ref(), "deal data")?;
    let params = scoring_params(&args, &config.scoring);
    info!(
        data = %data_path.display(),
        top_n = params.top_n,
        threshold = ?params.stagnation_threshold,
        "Starting deal scoring"
    );

    let (deals, _) = load_deals(&data_path)?;
    let engine = RiskEngine::new(params);

    let history_path = args
        .history
        .clone()
        .or_else(|| config.data.history_path.as_ref().map(Into::into));
    let report = match history_path {
        Some(path) => {
            let (history, _) = load_deals(&path)?;
            info!(history = %path.display(), rows = history.len(), "Using separate stage history");
            let stages = StageLossTable::from_deals(&history);
            engine.score_with_stage_table(&deals, &stages)?
        }
        None => engine.score(&deals)?,
    };

    let rendered = match args.output {
        OutputFormat::Text if args.explain => report.explained_summary(),
        OutputFormat::Text => report.summary(),
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Csv => report.to_csv()?,
    };
    println!("{}", rendered);

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, &rendered)
            .with_context(|| format!("Failed to save results to {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}

/// Configured parameters with CLI overrides applied.
fn scoring_params(args: &ScoreArgs, configured: &ScoringParams) -> ScoringParams {
    let mut params = configured.clone();
    if let Some(weight) = args.cycle_weight {
        params.cycle_weight = weight;
    }
    if let Some(weight) = args.stagnation_weight {
        params.stagnation_weight = weight;
    }
    if let Some(weight) = args.stage_weight {
        params.stage_weight = weight;
    }
    if let Some(threshold) = args.threshold {
        params.stagnation_threshold = Some(threshold);
    }
    if let Some(top_n) = args.top_n {
        params.top_n = top_n;
    }
    if let Some(policy) = args.missing_dates {
        params.missing_dates = policy.into();
    }
    if let Some(policy) = args.unknown_stage {
        params.unknown_stage = policy.into();
    }
    params
}
