//! Logging initialization

use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter directive: `--debug` wins, then a non-empty `RUST_LOG`, then `warn`
fn filter_directive(debug: bool, rust_log: Option<String>) -> String {
    if debug {
        return "debug".to_string();
    }
    rust_log
        .filter(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| "warn".to_string())
}

/// Initialize logging
///
/// Logs go to stderr so table output on stdout stays clean, or to `log_file`
/// without ANSI codes when one is given. `RUST_LOG` applies only without the
/// debug flag.
pub fn init_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let directive = filter_directive(debug, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_writer(file)
                .with_env_filter(filter)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .with_target(debug)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
        }
    }

    tracing::debug!("Logging initialized");
    Ok(())
}
