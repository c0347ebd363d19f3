//! Domain Layer
//!
//! Core types with no dependency on transport or storage.

pub mod connection;
pub mod market;
pub mod snapshot;

pub use connection::ConnectionState;
pub use market::{
    HealthResponse, HistoryMetric, HistoryResponse, OverviewResponse, RecentEvent,
    RecentEventsResponse, Sentiment, SentimentSummary, TimeSeriesPoint, TimeSeriesResponse,
    TrendItem, TrendMetric, TrendsResponse,
};
pub use snapshot::{Snapshot, SnapshotCollection, Timestamp, Trend};
