//! Deal risk scoring CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, DEFAULT_CONFIG_PATH};
use deal_config::load_config;
use deal_monitor::setup_logging;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicitly passed config file must exist; the default one may not.
    let config_required = cli.config.is_some();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = load_config(&config_path, config_required)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    // Setup logging
    let log_level = match cli.log_level {
        Some(level) => level.as_str().to_string(),
        None => config.logging.level.clone(),
    };
    let json_logs = cli.json_logs || config.logging.format.eq_ignore_ascii_case("json");
    let log_file = config.logging.file.as_deref().map(Path::new);
    let _log_guard = setup_logging(&log_level, json_logs, log_file);

    // Execute command
    match cli.command {
        Commands::Score(args) => cli::commands::score::run(args, &config),
        Commands::Stages(args) => cli::commands::stages::run(args, &config),
        Commands::ValidateConfig => cli::commands::validate::run(&config_path, &config),
        Commands::InitConfig(args) => cli::commands::init::run(args),
    }
}
