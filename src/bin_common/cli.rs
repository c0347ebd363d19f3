//! CLI utilities for binaries
//!
//! Configuration path lookup and environment loading shared by the
//! executables.

use std::path::PathBuf;
use tracing::debug;

/// Type of configuration to load
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Monitor configuration (monitor_config.yaml)
    Monitor,
    /// Custom path
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Monitor => cryptoviz::infrastructure::config::DEFAULT_CONFIG_PATH,
            ConfigType::Custom(path) => path,
        }
    }

    /// Environment variable that overrides the path, if any
    pub fn env_var_name(&self) -> Option<&'static str> {
        match self {
            ConfigType::Monitor => Some("MONITOR_CONFIG_PATH"),
            ConfigType::Custom(_) => None,
        }
    }
}

/// Load configuration path from environment or use default
///
/// # Examples
/// ```
/// use cryptoviz_monitor::bin_common::{load_config_from_env, ConfigType};
///
/// let path = load_config_from_env(ConfigType::Custom("monitor.yaml".into()));
/// assert_eq!(path.to_str(), Some("monitor.yaml"));
/// ```
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    config_type
        .env_var_name()
        .and_then(|name| std::env::var(name).ok())
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| config_type.default_path().to_string())
        .into()
}

/// Load `.env` from the working directory if present
pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(_) => debug!("No .env file found"),
    }
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}
