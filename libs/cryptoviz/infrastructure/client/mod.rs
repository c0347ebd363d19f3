//! CryptoViz backend clients

pub mod api;

pub use api::{ApiClient, ApiError, Result, DEFAULT_TIMEOUT};
