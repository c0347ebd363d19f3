use crate::core::channel::PushChannel;
use crate::traits::Result;
use async_trait::async_trait;

/// Opens push channels
///
/// `open` resolves once the channel is usable (handshake complete) or fails
/// with the reason it could not be opened. Everything that happens after
/// that is reported through the returned channel's events.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Open a push channel to `url`
    async fn open(&self, url: &str) -> Result<PushChannel>;
}
