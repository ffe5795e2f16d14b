//! Configuration loading
//!
//! Built-in defaults, then the root config file, then environment overrides.

use std::path::Path;

use anyhow::{Context, Result};

use super::{paths, schema::Config};

/// Overrides `defaultNamespace`
pub const NAMESPACE_ENV: &str = "FLUX_INVENTORY_NAMESPACE";
/// Overrides `resolver.maxConcurrentFetches`
pub const MAX_CONCURRENT_ENV: &str = "FLUX_INVENTORY_MAX_CONCURRENT";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the default location
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Root config file
    /// 3. Built-in defaults
    pub fn load() -> Result<Config> {
        Self::load_from(&paths::root_config_path())
    }

    /// Load configuration from `path`, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Config> {
        let config = if path.exists() {
            Self::load_file(path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Config::default()
        };

        Self::apply_env_overrides(config, |key| std::env::var(key).ok())
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        // An empty file parses as YAML null
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the config file at `path`
    ///
    /// Fails on invalid YAML, invalid value types or an empty default namespace.
    /// A missing file is valid.
    pub fn validate(path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let config = Self::load_file(path)?;
        if config.default_namespace.trim().is_empty() {
            return Err(anyhow::anyhow!("defaultNamespace must not be empty"));
        }

        Ok(())
    }

    /// Apply environment variable overrides, reading variables through `lookup`
    pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(namespace) = lookup(NAMESPACE_ENV).filter(|ns| !ns.is_empty()) {
            config.default_namespace = namespace;
        }

        if let Some(max) = lookup(MAX_CONCURRENT_ENV) {
            config.resolver.max_concurrent_fetches = max
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number, got '{}'", MAX_CONCURRENT_ENV, max))?;
        }

        Ok(config)
    }
}
