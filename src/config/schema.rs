//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Namespace used when no `-n` flag is given
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Inventory resolution settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Inventory resolution settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Upper bound on fetches in flight; 0 means unbounded
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Per-entry fetch timeout; 0 disables the timeout
    #[serde(default = "default_fetch_timeout_seconds")]
    pub fetch_timeout_seconds: u64,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    /// List entries that could not be resolved below the inventory table
    #[serde(default = "default_true")]
    pub show_unresolved: bool,
}

fn default_namespace() -> String {
    "flux-system".to_string()
}

fn default_max_concurrent_fetches() -> usize {
    16
}

fn default_fetch_timeout_seconds() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            resolver: ResolverConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_max_concurrent_fetches(),
            fetch_timeout_seconds: default_fetch_timeout_seconds(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            show_unresolved: default_true(),
        }
    }
}

impl ResolverConfig {
    /// Fetch concurrency limit, `None` when unbounded
    pub fn concurrency_limit(&self) -> Option<usize> {
        (self.max_concurrent_fetches > 0).then_some(self.max_concurrent_fetches)
    }

    pub fn fetch_timeout(&self) -> Option<std::time::Duration> {
        (self.fetch_timeout_seconds > 0)
            .then(|| std::time::Duration::from_secs(self.fetch_timeout_seconds))
    }
}
