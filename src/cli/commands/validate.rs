//! Validate configuration command.

use anyhow::Result;
use deal_config::AppConfig;
use std::path::Path;

pub fn run(config_path: &Path, config: &AppConfig) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);
    if !config_path.exists() {
        println!("No configuration file; using defaults.");
    }

    if let Err(e) = config.scoring.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Cycle weight: {}", config.scoring.cycle_weight);
    println!("Stagnation weight: {}", config.scoring.stagnation_weight);
    println!("Stage weight: {}", config.scoring.stage_weight);
    match config.scoring.stagnation_threshold {
        Some(days) => println!("Stagnation threshold: {} days", days),
        None => println!("Stagnation threshold: dataset median"),
    }
    println!("Top N: {}", config.scoring.top_n);
    println!("Missing dates: {:?}", config.scoring.missing_dates);
    println!("Unknown stage: {:?}", config.scoring.unknown_stage);

    Ok(())
}
