//! CryptoViz Monitor
//!
//! Live market snapshots and news-sentiment data from the CryptoViz backend.
//!
//! ## Architecture
//!
//! - **domain**: snapshot collection, connection state and API payload types
//! - **infrastructure**: REST client, configuration, settings store, logging
//! - **application**: live data acquisition policy, auto refresh, export and
//!   analytics built on top of the other two layers

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used items
pub use application::{
    AcquisitionConfig, AcquisitionError, AutoRefresh, LiveDataPolicy, MalformedFramePolicy,
    PolicyEvent, PolicyView, PushOutcome, ReconnectPolicy, RefreshState, SnapshotFeed,
    SnapshotSource,
};
pub use domain::{ConnectionState, Snapshot, SnapshotCollection, TimeSeriesPoint, Timestamp, Trend};
pub use infrastructure::{
    init_tracing, init_tracing_with_level, ApiClient, ApiError, DashboardSettings,
    FileSettingsStore, Heartbeat, MemorySettingsStore, MonitorConfig, SettingsService,
    SettingsStore, ShutdownManager,
};
