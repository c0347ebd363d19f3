//! Monitor configuration
//!
//! Loaded from YAML; `API_BASE_URL` in the environment (or `.env`) overrides
//! the file's base URL.

use pushsockets::{ExponentialBackoff, FixedDelay, NeverReconnect, ReconnectionStrategy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config/monitor_config.yaml";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Handling of push frames that do not decode into a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedFramePolicy {
    /// Discard, debug log only
    #[default]
    Drop,
    /// Discard and bump the malformed frame counter
    Count,
    /// Treat like a channel failure and fall back to polling
    Fallback,
}

/// Re-open behaviour after the push channel fails
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum ReconnectPolicy {
    /// Polling is permanent until the next start
    #[default]
    Never,
    Fixed {
        delay_ms: u64,
        #[serde(default)]
        max_attempts: Option<usize>,
    },
    Exponential {
        initial_ms: u64,
        max_ms: u64,
        #[serde(default)]
        max_attempts: Option<usize>,
    },
}

impl ReconnectPolicy {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ReconnectPolicy::Never)
    }

    pub fn strategy(&self) -> Box<dyn ReconnectionStrategy> {
        match self {
            ReconnectPolicy::Never => Box::new(NeverReconnect),
            ReconnectPolicy::Fixed { delay_ms, max_attempts } => {
                Box::new(FixedDelay::new(Duration::from_millis(*delay_ms), *max_attempts))
            }
            ReconnectPolicy::Exponential {
                initial_ms,
                max_ms,
                max_attempts,
            } => Box::new(ExponentialBackoff::new(
                Duration::from_millis(*initial_ms),
                Duration::from_millis(*max_ms),
                *max_attempts,
            )),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            ReconnectPolicy::Never => Ok(()),
            ReconnectPolicy::Fixed { delay_ms, .. } if *delay_ms == 0 => Err(
                ConfigError::ValidationError("reconnect.delay_ms must be greater than 0".to_string()),
            ),
            ReconnectPolicy::Exponential { initial_ms, max_ms, .. } if *initial_ms == 0 || max_ms < initial_ms => {
                Err(ConfigError::ValidationError(
                    "reconnect.initial_ms must be > 0 and <= reconnect.max_ms".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// `acquisition:` block of the YAML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionSection {
    pub enabled: bool,
    pub poll_interval_ms: u64,
    pub prefer_push: bool,
    pub malformed_frames: MalformedFramePolicy,
    pub reconnect: ReconnectPolicy,
}

impl Default for AcquisitionSection {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: 5000,
            prefer_push: true,
            malformed_frames: MalformedFramePolicy::Drop,
            reconnect: ReconnectPolicy::Never,
        }
    }
}

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub api_base_url: String,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub settings_path: PathBuf,
    pub heartbeat_interval_secs: u64,
    pub acquisition: AcquisitionSection,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            log_level: "info".to_string(),
            request_timeout_secs: 10,
            settings_path: PathBuf::from(".cryptoviz/settings.json"),
            heartbeat_interval_secs: 30,
            acquisition: AcquisitionSection::default(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a YAML file
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        Self::from_yaml_str(&yaml_content)
    }

    /// Load from `config_path` if it exists, otherwise start from defaults
    ///
    /// Environment overrides and validation apply either way.
    pub fn load_or_default(config_path: impl AsRef<Path>) -> Result<Self> {
        let path = config_path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        info!("Config file {} not found, using defaults", path.display());
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to an empty mapping
        let mut config: MonitorConfig = if yaml.trim().is_empty() {
            MonitorConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(API_BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                info!("Overriding API base URL from environment variable");
                self.api_base_url = base_url;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api_base_url must not be empty".to_string(),
            ));
        }

        pushsockets::push_url(&self.api_base_url)
            .map_err(|e| ConfigError::ValidationError(format!("api_base_url: {}", e)))?;

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of {:?}, got '{}'",
                LOG_LEVELS, self.log_level
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.heartbeat_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "heartbeat_interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.acquisition.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "acquisition.poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        self.acquisition.reconnect.validate()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Monitor Configuration:");
        info!("  API base URL: {}", self.api_base_url);
        info!("  Log level: {}", self.log_level);
        info!("  Request timeout: {}s", self.request_timeout_secs);
        info!("  Settings file: {}", self.settings_path.display());
        info!("  Heartbeat: every {}s", self.heartbeat_interval_secs);
        info!(
            "  Acquisition: enabled={} prefer_push={} poll={}ms malformed={:?} reconnect={:?}",
            self.acquisition.enabled,
            self.acquisition.prefer_push,
            self.acquisition.poll_interval_ms,
            self.acquisition.malformed_frames,
            self.acquisition.reconnect,
        );
    }
}
