//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use rfimatch_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "rfimatch.toml";

/// Resolve which config file to read, if any
///
/// An explicit path must exist; the implicit `rfimatch.toml` is optional.
pub fn config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Ok(Some(path.to_path_buf()))
        }
        None => {
            let implicit = PathBuf::from(DEFAULT_CONFIG_FILE);
            Ok(implicit.is_file().then_some(implicit))
        }
    }
}

/// Load layered configuration: defaults, file, environment, then CLI overrides
pub fn load_config(explicit: Option<&Path>, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_file(explicit)? {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides);
    config.validate().context("Invalid configuration")?;

    Ok(config)
}
