//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use deal_scoring::{MissingDatePolicy, UnknownStagePolicy};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Parser)]
#[command(name = "deal-risk")]
#[command(author, version, about = "Rank open sales deals by estimated closure risk")]
pub struct Cli {
    /// Configuration file path [default: config/default.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (overrides the configured level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score deals and print the riskiest
    Score(ScoreArgs),
    /// Show per-stage loss rates for a deal export
    Stages(StagesArgs),
    /// Validate configuration
    ValidateConfig,
    /// Write the default configuration to a file
    InitConfig(InitArgs),
}

#[derive(clap::Args)]
pub struct ScoreArgs {
    /// Deal export to score (CSV)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Separate deal history used for stage loss rates (CSV)
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Weight of the normalized sales cycle
    #[arg(long, allow_negative_numbers = true)]
    pub cycle_weight: Option<f64>,

    /// Weight of the stagnation flag
    #[arg(long, allow_negative_numbers = true)]
    pub stagnation_weight: Option<f64>,

    /// Weight of the stage loss rate
    #[arg(long, allow_negative_numbers = true)]
    pub stage_weight: Option<f64>,

    /// Stagnation threshold in days (defaults to the dataset median)
    #[arg(short, long, allow_negative_numbers = true)]
    pub threshold: Option<f64>,

    /// Number of deals to return
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Treatment of deals without a sales cycle
    #[arg(long)]
    pub missing_dates: Option<MissingDates>,

    /// Treatment of stages absent from the history
    #[arg(long)]
    pub unknown_stage: Option<UnknownStage>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,

    /// Include each deal's signal breakdown in text output
    #[arg(long)]
    pub explain: bool,

    /// Save results to file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct StagesArgs {
    /// Deal export (CSV)
    #[arg(long)]
    pub data: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct InitArgs {
    /// Destination file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MissingDates {
    Exclude,
    MaxRisk,
}

impl From<MissingDates> for MissingDatePolicy {
    fn from(value: MissingDates) -> Self {
        match value {
            MissingDates::Exclude => MissingDatePolicy::Exclude,
            MissingDates::MaxRisk => MissingDatePolicy::MaxRisk,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum UnknownStage {
    Neutral,
    Reject,
}

impl From<UnknownStage> for UnknownStagePolicy {
    fn from(value: UnknownStage) -> Self {
        match value {
            UnknownStage::Neutral => UnknownStagePolicy::Neutral,
            UnknownStage::Reject => UnknownStagePolicy::Reject,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}
