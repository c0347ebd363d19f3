//! # PushSockets Traits
//!
//! Core traits and types shared by the transport and its consumers:
//!
//! - **Connector**: open a push channel to a URL
//! - **FrameDecoder**: turn a raw frame into a typed payload
//! - **ReconnectionStrategy**: control retry timing after a failure
//!
//! ## Example
//!
//! ```rust,ignore
//! use pushsockets::*;
//!
//! struct TickerDecoder;
//!
//! impl FrameDecoder for TickerDecoder {
//!     type Frame = Ticker;
//!
//!     fn decode(&self, message: &WsMessage) -> Result<Ticker> {
//!         // Your decoding logic here
//!     }
//! }
//! ```

pub mod connector;
pub mod error;
pub mod parser;
pub mod reconnect;

// Re-export commonly used types
pub use connector::Connector;
pub use error::{PushSocketError, Result};
pub use parser::{FrameDecoder, JsonFrameDecoder, WsMessage};
pub use reconnect::{ExponentialBackoff, FixedDelay, NeverReconnect, ReconnectionStrategy};
