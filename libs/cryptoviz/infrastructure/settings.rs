//! Dashboard settings persistence
//!
//! Settings live in a string key-value store under [`SETTINGS_KEY`] as one
//! JSON record. Loading never fails: a missing key, an unreadable store or a
//! malformed record all fall back to defaults.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const SETTINGS_KEY: &str = "cryptoviz-settings";
pub const DEFAULT_KAFKA_TOPIC: &str = "crypto-events";
pub const DEFAULT_REFRESH_RATE_MS: u64 = 2000;
pub const MIN_REFRESH_RATE_MS: u64 = 500;
pub const MAX_REFRESH_RATE_MS: u64 = 30_000;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings store is not a JSON object")]
    NotAnObject,
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// String key-value store capability
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.values.lock().insert(key.into(), value.into());
        store
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object file, one string value per key
///
/// The file is created (with parent directories) on first write.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(SettingsError::NotAnObject),
        }
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.get(key).and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock();

        // A corrupt file is replaced rather than blocking every save
        let mut all = self.read_all().unwrap_or_else(|e| {
            warn!("Discarding unreadable settings file {}: {}", self.path.display(), e);
            Map::new()
        });
        all.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&Value::Object(all))?)?;
        debug!("Wrote settings key '{}' to {}", key, self.path.display());
        Ok(())
    }
}

/// The persisted dashboard settings record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSettings {
    pub kafka_topic: String,
    /// Panel refresh period in milliseconds
    pub refresh_rate: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            kafka_topic: DEFAULT_KAFKA_TOPIC.to_string(),
            refresh_rate: DEFAULT_REFRESH_RATE_MS,
        }
    }
}

impl DashboardSettings {
    /// Parse a stored record, falling back per field
    ///
    /// An empty topic or a zero/non-numeric rate keeps that field's default.
    /// Returns `None` when `raw` is not a JSON object at all.
    pub fn from_stored(raw: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(raw).ok()?;
        let record = value.as_object()?;
        let mut settings = Self::default();

        if let Some(topic) = record.get("kafkaTopic").and_then(Value::as_str) {
            if !topic.is_empty() {
                settings.kafka_topic = topic.to_string();
            }
        }
        if let Some(rate) = record.get("refreshRate").and_then(Value::as_f64) {
            if rate >= 1.0 && rate.is_finite() {
                settings.refresh_rate = rate as u64;
            }
        }

        Some(settings)
    }

    /// Copy with the refresh rate pulled into the accepted range
    pub fn clamped(&self) -> Self {
        Self {
            kafka_topic: self.kafka_topic.clone(),
            refresh_rate: self.refresh_rate.clamp(MIN_REFRESH_RATE_MS, MAX_REFRESH_RATE_MS),
        }
    }

    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.refresh_rate)
    }
}

/// Loads and saves [`DashboardSettings`] through an injected store
pub struct SettingsService<S: SettingsStore> {
    store: S,
}

impl<S: SettingsStore> SettingsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load(&self) -> DashboardSettings {
        match self.store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => DashboardSettings::from_stored(&raw).unwrap_or_else(|| {
                debug!("Ignoring malformed settings record");
                DashboardSettings::default()
            }),
            Ok(None) => DashboardSettings::default(),
            Err(e) => {
                warn!("Failed to read settings, using defaults: {}", e);
                DashboardSettings::default()
            }
        }
    }

    /// Persist `settings` (refresh rate clamped) and return what was stored
    pub fn save(&self, settings: &DashboardSettings) -> Result<DashboardSettings> {
        let stored = settings.clamped();
        let raw = serde_json::to_string(&stored)?;
        self.store.set(SETTINGS_KEY, &raw)?;
        info!(
            "Saved settings: topic={} refresh_rate={}ms",
            stored.kafka_topic, stored.refresh_rate
        );
        Ok(stored)
    }
}
