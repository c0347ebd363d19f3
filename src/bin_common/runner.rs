//! Binary runner utilities
//!
//! Banner and shutdown logging plus a small trait the long-running binaries
//! implement.

use tracing::info;

/// Configuration for running a binary application
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the binary (for logging)
    pub name: String,
    /// Heartbeat interval in seconds
    pub heartbeat_interval_secs: u64,
}

impl RunConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            heartbeat_interval_secs: 30,
        }
    }

    pub fn with_heartbeat(mut self, secs: u64) -> Self {
        self.heartbeat_interval_secs = secs;
        self
    }
}

/// Trait for long-running binaries
#[allow(async_fn_in_trait)]
pub trait BinaryRunner {
    /// Run the application main loop
    async fn run(&mut self) -> anyhow::Result<()>;

    fn config(&self) -> &RunConfig;

    /// Summary line for the shutdown banner
    fn stats(&self) -> Option<String> {
        None
    }

    /// Execute the binary with banners around the main loop
    async fn execute(&mut self) -> anyhow::Result<()> {
        print_banner(&self.config().name);
        let result = self.run().await;
        print_shutdown(&self.config().name, self.stats().as_deref());
        result
    }
}

pub fn print_banner(name: &str) {
    info!("");
    info!("========================================");
    info!("Starting {}", name);
    info!("Press Ctrl+C to stop");
    info!("========================================");
    info!("");
}

pub fn print_shutdown(name: &str, stats: Option<&str>) {
    info!("");
    info!("========================================");
    info!("{} stopped gracefully", name);
    if let Some(stats) = stats {
        info!("{}", stats);
    }
    info!("========================================");
}
