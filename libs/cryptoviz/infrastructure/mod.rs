//! Infrastructure Layer
//!
//! REST client, configuration, settings persistence and process plumbing.
//! Depends on the domain layer but not on the application layer.

pub mod client;
pub mod config;
pub mod heartbeat;
pub mod logging;
pub mod settings;
pub mod shutdown;

pub use client::{ApiClient, ApiError};
pub use config::{AcquisitionSection, ConfigError, MalformedFramePolicy, MonitorConfig, ReconnectPolicy};
pub use heartbeat::Heartbeat;
pub use logging::{init_tracing, init_tracing_with_level};
pub use settings::{
    DashboardSettings, FileSettingsStore, MemorySettingsStore, SettingsError, SettingsService,
    SettingsStore, SETTINGS_KEY,
};
pub use shutdown::ShutdownManager;
