use thiserror::Error;

/// Main error type for pushsockets
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PushSocketError {
    /// WebSocket handshake or transport error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Connection closed unexpectedly
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// URL cannot be turned into a push endpoint
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Frame could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Channel send error (receiver gone)
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

/// Result type for pushsockets operations
pub type Result<T> = std::result::Result<T, PushSocketError>;
