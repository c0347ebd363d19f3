use crate::domain::Snapshot;
use crate::infrastructure::{ApiClient, ApiError};
use async_trait::async_trait;

/// Full-list snapshot fetch used while polling
#[async_trait]
pub trait SnapshotSource: Send + Sync + 'static {
    async fn fetch_snapshots(&self) -> Result<Vec<Snapshot>, ApiError>;
}

#[async_trait]
impl SnapshotSource for ApiClient {
    async fn fetch_snapshots(&self) -> Result<Vec<Snapshot>, ApiError> {
        self.cryptos().await
    }
}
