//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod process;
pub mod providers;

use std::path::PathBuf;

use fuelx_core::FuelxConfig;
use tracing::debug;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fuelx")
        .join("config.json")
}

/// Resolve the config file to use: `-c` if given, else the default path.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration, falling back to defaults when no file exists.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<FuelxConfig> {
    let path = config_path(explicit);

    if explicit.is_some() || path.exists() {
        debug!("Loading configuration from {}", path.display());
        return Ok(FuelxConfig::from_file(&path)?);
    }

    Ok(FuelxConfig::default())
}
