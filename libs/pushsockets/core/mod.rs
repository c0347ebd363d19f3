//! # PushSockets Core
//!
//! Channel handle, events and the tokio-tungstenite transport.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pushsockets::{push_url, ChannelEvent, Connector, TungsteniteConnector};
//!
//! #[tokio::main]
//! async fn main() -> pushsockets::Result<()> {
//!     let url = push_url("http://localhost:8000")?;
//!     let mut channel = TungsteniteConnector::new().open(&url).await?;
//!
//!     while let Some(event) = channel.next_event().await {
//!         match event {
//!             ChannelEvent::Frame(frame) => println!("frame: {:?}", frame),
//!             ChannelEvent::Error(e) => { eprintln!("error: {}", e); break; }
//!             ChannelEvent::Closed(_) => break,
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod event;
pub mod tungstenite;
pub mod url;

// Re-export main types
pub use channel::{ChannelFeed, PushChannel};
pub use event::ChannelEvent;
pub use tungstenite::TungsteniteConnector;
pub use url::push_url;

// Re-export traits for convenience
pub use crate::traits::*;
