use crate::traits::error::{PushSocketError, Result};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Type alias for WebSocket messages
/// Can be Text or Binary data
#[derive(Debug, Clone, PartialEq)]
pub enum WsMessage {
    Text(String),
    Binary(Vec<u8>),
}

impl WsMessage {
    /// Get the message as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            WsMessage::Text(s) => Some(s),
            WsMessage::Binary(_) => None,
        }
    }

    /// Raw payload bytes, regardless of frame kind
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            WsMessage::Text(s) => s.as_bytes(),
            WsMessage::Binary(b) => b,
        }
    }

    /// Check if message is text
    pub fn is_text(&self) -> bool {
        matches!(self, WsMessage::Text(_))
    }

    /// Check if message is binary
    pub fn is_binary(&self) -> bool {
        matches!(self, WsMessage::Binary(_))
    }
}

impl From<&str> for WsMessage {
    fn from(text: &str) -> Self {
        WsMessage::Text(text.to_string())
    }
}

impl From<String> for WsMessage {
    fn from(text: String) -> Self {
        WsMessage::Text(text)
    }
}

/// Trait for decoding push frames
///
/// Implement this trait to turn a raw frame into the typed payload the
/// consumer works with. Decoding is synchronous: it runs once per received
/// frame with no suspension inside the handler.
pub trait FrameDecoder: Send + Sync + 'static {
    /// The decoded payload type
    type Frame: Send + 'static;

    /// Decode a received frame
    ///
    /// # Returns
    /// * `Ok(frame)` - Frame decoded successfully
    /// * `Err(PushSocketError::Decode)` - Frame is malformed
    fn decode(&self, message: &WsMessage) -> Result<Self::Frame>;
}

/// Decodes each frame as one JSON document of type `T`
///
/// Text and binary frames are both accepted; binary frames must hold UTF-8
/// JSON.
pub struct JsonFrameDecoder<T> {
    _frame: PhantomData<fn() -> T>,
}

impl<T> JsonFrameDecoder<T> {
    pub fn new() -> Self {
        Self { _frame: PhantomData }
    }
}

impl<T> Default for JsonFrameDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameDecoder for JsonFrameDecoder<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Frame = T;

    fn decode(&self, message: &WsMessage) -> Result<T> {
        serde_json::from_slice(message.as_bytes())
            .map_err(|e| PushSocketError::Decode(e.to_string()))
    }
}
