//! Configuration for flux-inventory
//!
//! A single YAML file in the platform config directory, with environment
//! variable overrides on top.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, OutputConfig, ResolverConfig};

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "defaultNamespace" => Ok(config.default_namespace.clone()),
        "resolver.maxConcurrentFetches" => Ok(config.resolver.max_concurrent_fetches.to_string()),
        "resolver.fetchTimeoutSeconds" => Ok(config.resolver.fetch_timeout_seconds.to_string()),
        "output.showUnresolved" => Ok(config.output.show_unresolved.to_string()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}
