mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RANDR_SPLIT_CONFIG";

/// Returns the config directory: $XDG_CONFIG_HOME/randr-split/
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("randr-split");
    Ok(dir)
}

/// Returns the config file path: $RANDR_SPLIT_CONFIG, or
/// $XDG_CONFIG_HOME/randr-split/config.toml
pub fn config_path() -> Result<PathBuf> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(config_dir()?.join("config.toml")),
    }
}

/// Parse and validate a TOML config. Missing keys take their defaults.
pub fn parse_config(contents: &str) -> Result<SplitConfig> {
    let config: SplitConfig = toml::from_str(contents)?;
    config.layout()?;
    Ok(config)
}

/// Load config from disk, or return default if not found.
pub fn load_config() -> Result<SplitConfig> {
    let path = config_path()?;
    if path.exists() {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = parse_config(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        info!(?path, "Loaded config");
        Ok(config)
    } else {
        info!("No config found, using defaults");
        Ok(SplitConfig::default())
    }
}

/// Load config, falling back to the defaults on any error.
pub fn load_config_or_default() -> SplitConfig {
    load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        SplitConfig::default()
    })
}
