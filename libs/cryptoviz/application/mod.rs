//! Application Layer
//!
//! Services built on the domain and infrastructure layers: the live data
//! acquisition policy plus the panel helpers around it.

pub mod acquisition;
pub mod analytics;
pub mod export;
pub mod refresh;

pub use acquisition::{
    AcquisitionConfig, AcquisitionError, LiveDataPolicy, MalformedFramePolicy, PolicyEvent,
    PolicyView, PushOutcome, ReconnectPolicy, SnapshotFeed, SnapshotSource,
};
pub use analytics::{calculate_average, find_peak_hour, format_compact_number};
pub use export::{to_csv, to_json, write_csv, write_export, write_json, ExportError, ExportFormat};
pub use refresh::{AutoRefresh, RefreshState};
