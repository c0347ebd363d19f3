//! CryptoViz Monitor - Main Library
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, runners)
//! - **cryptoviz**: Domain, REST client and acquisition policy (re-exported from workspace)
//! - **pushsockets**: Push channel transport (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust
//! use cryptoviz_monitor::bin_common::{load_config_from_env, ConfigType};
//! use cryptoviz_monitor::cryptoviz::LiveDataPolicy;
//! ```

// Re-export workspace libraries for convenience
pub use cryptoviz;
pub use pushsockets;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;
    pub mod runner;

    pub use cli::{load_config_from_env, load_dotenv, parse_args, ConfigType};
    pub use runner::{print_banner, print_shutdown, BinaryRunner, RunConfig};
}
