//! Live data acquisition
//!
//! Push first, polling as the fallback. See [`LiveDataPolicy`].

pub mod config;
pub mod feed;
pub mod policy;
pub mod ports;
pub mod view;

pub use config::{AcquisitionConfig, AcquisitionError, MalformedFramePolicy, ReconnectPolicy};
pub use feed::{PushOutcome, SnapshotFeed};
pub use policy::LiveDataPolicy;
pub use ports::SnapshotSource;
pub use view::{PolicyEvent, PolicyView};
