//! # PushSockets
//!
//! Push-channel transport for live snapshot feeds.
//!
//! ## Features
//!
//! - **Connector abstraction**: the consumer asks a [`Connector`] for a
//!   [`PushChannel`] and never touches the socket directly
//! - **Owned channel handle**: dropping or closing the handle tears down the
//!   underlying connection
//! - **Uniform events**: frames, errors and closes arrive on one ordered stream
//! - **Pluggable reconnection**: fixed, exponential or no retry

pub mod traits;
pub mod core;

// Re-export all traits
pub use traits::*;

// Re-export core functionality
pub use crate::core::{
    channel, event, tungstenite, url,
    channel::{ChannelFeed, PushChannel},
    tungstenite::TungsteniteConnector,
    event::ChannelEvent,
    url::push_url,
};

/// Type alias for Result with PushSocketError
pub type Result<T> = std::result::Result<T, traits::PushSocketError>;
