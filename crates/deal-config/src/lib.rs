//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, DataSettings, LoggingConfig};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// When `required` is false a missing file falls back to defaults.
pub fn load_config(path: &Path, required: bool) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(
            Environment::with_prefix("DEAL_RISK")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_layers() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("deal-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[scoring]\ntop_n = 15\nstagnation_threshold = 30.0\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        // Environment overrides the file.
        std::env::set_var("DEAL_RISK__SCORING__TOP_N", "3");
        let config = load_config(&path, true).unwrap();
        std::env::remove_var("DEAL_RISK__SCORING__TOP_N");
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.scoring.top_n, 3);
        assert_eq!(config.scoring.stagnation_threshold, Some(30.0));
        assert_eq!(config.scoring.cycle_weight, 0.4);
        assert_eq!(config.logging.level, "debug");

        // A missing optional file falls back to defaults.
        let missing = dir.join(format!("deal-config-missing-{}.toml", std::process::id()));
        let config = load_config(&missing, false).unwrap();
        assert_eq!(config.scoring.top_n, 10);
        assert_eq!(config.app.name, "deal-risk");

        assert!(load_config(&missing, true).is_err());
    }
}
