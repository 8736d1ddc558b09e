//! Write default configuration command.

use anyhow::{bail, Context, Result};
use deal_config::AppConfig;

use crate::cli::InitArgs;

pub fn run(args: InitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "{} already exists; pass --force to overwrite",
            args.path.display()
        );
    }

    if let Some(parent) = args.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let rendered = AppConfig::default().to_toml()?;
    std::fs::write(&args.path, rendered)
        .with_context(|| format!("Failed to write {}", args.path.display()))?;
    println!("Wrote default configuration to {}", args.path.display());

    Ok(())
}
