//! Configuration file loading.
//!
//! The file is TOML with two sections: `[processor]` (transforms, formats,
//! tool overrides) and `[storage]` (where the local provider writes).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vf_core::ProcessorConfig;

/// Locations searched when no `--config` is given.
const DEFAULT_PATHS: &[&str] = &[
    "./variantforge.toml",
    "~/.config/variantforge/config.toml",
    "/etc/variantforge/config.toml",
];

/// Root configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub processor: ProcessorConfig,
    pub storage: StorageConfig,
}

/// Settings for the local filesystem storage provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory variants are copied into.
    pub root: PathBuf,
    /// URL prefix under which `root` is served.
    pub base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./variants"),
            base_url: "/variants".to_string(),
        }
    }
}

/// Parse and validate configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse config")?;
    validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    parse_config(&content).with_context(|| format!("Invalid config file: {:?}", path))
}

/// Load config from the given path or the first default location that exists.
///
/// Unlike most settings, transforms have no sensible default, so a missing
/// file is an error.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    for path_str in DEFAULT_PATHS {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {}", path.display());
            return load_config(path);
        }
    }

    anyhow::bail!(
        "No config file found (looked in {}); transforms must be configured",
        DEFAULT_PATHS.join(", ")
    )
}

fn validate_config(config: &Config) -> Result<()> {
    config.processor.validate()?;

    if config.storage.base_url.trim().is_empty() {
        anyhow::bail!("storage.base_url cannot be empty");
    }

    Ok(())
}
