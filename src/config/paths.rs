//! Configuration path resolution
//!
//! - Linux/macOS: XDG_CONFIG_HOME/flux-inventory or ~/.config/flux-inventory
//! - Windows: %APPDATA%\flux-inventory\config

use std::path::PathBuf;

/// Environment variable that replaces the configuration directory
pub const CONFIG_DIR_ENV: &str = "FLUX_INVENTORY_CONFIG_DIR";

const APP_NAME: &str = "flux-inventory";

/// Get the configuration directory path
///
/// Checks `FLUX_INVENTORY_CONFIG_DIR` first, then the platform default.
pub fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| platform_config_dir())
}

fn platform_config_dir() -> PathBuf {
    #[cfg(windows)]
    {
        use directories::ProjectDirs;
        ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
    }
    #[cfg(not(windows))]
    {
        use directories::BaseDirs;
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                BaseDirs::new()
                    .map(|dirs| dirs.home_dir().join(".config"))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config"))
            })
            .join(APP_NAME)
    }
}

/// Get the root configuration file path
pub fn root_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}
