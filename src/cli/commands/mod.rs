//! CLI command implementations.

pub mod init;
pub mod score;
pub mod stages;
pub mod validate;

use anyhow::{Context, Result};
use deal_core::types::DealRecord;
use deal_data::LoadSummary;
use std::path::{Path, PathBuf};

/// Pick the CLI path if given, else the configured one.
fn resolve_path(cli: Option<PathBuf>, configured: Option<&String>, what: &str) -> Result<PathBuf> {
    cli.or_else(|| configured.map(PathBuf::from)).with_context(|| {
        format!("No {what} given; pass it on the command line or set it in the config")
    })
}

fn load_deals(path: &Path) -> Result<(Vec<DealRecord>, LoadSummary)> {
    let path_str = path
        .to_str()
        .with_context(|| format!("Path is not valid UTF-8: {}", path.display()))?;
    deal_data::load_csv(path_str)
        .with_context(|| format!("Failed to load deals from {}", path.display()))
}
