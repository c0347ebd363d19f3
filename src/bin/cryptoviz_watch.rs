use anyhow::Result;
use cryptoviz::infrastructure::{FileSettingsStore, SettingsService};
use cryptoviz::{
    init_tracing_with_level, AcquisitionConfig, ApiClient, AutoRefresh, Heartbeat, LiveDataPolicy,
    MonitorConfig, PolicyEvent, ShutdownManager,
};
use cryptoviz::domain::OverviewResponse;
use cryptoviz::application::format_compact_number;
use cryptoviz_monitor::bin_common::{load_config_from_env, load_dotenv, BinaryRunner, ConfigType, RunConfig};
use std::time::Duration;
use tracing::{info, warn};

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

struct WatchApp {
    run_config: RunConfig,
    config: MonitorConfig,
    policy: LiveDataPolicy,
    overview: AutoRefresh<OverviewResponse>,
    shutdown: ShutdownManager,
    heartbeat: Heartbeat,
    updates_seen: u64,
}

impl WatchApp {
    fn new(config: MonitorConfig) -> Result<Self> {
        let client = ApiClient::with_timeout(&config.api_base_url, config.request_timeout())?;

        let settings = SettingsService::new(FileSettingsStore::new(&config.settings_path)).load();
        info!(
            "Dashboard settings: topic={} refresh_rate={}ms",
            settings.kafka_topic, settings.refresh_rate
        );

        let overview_client = client.clone();
        let overview = AutoRefresh::spawn(
            move || {
                let client = overview_client.clone();
                async move { client.overview().await }
            },
            settings.refresh_interval(),
        );

        Ok(Self {
            run_config: RunConfig::new("CryptoViz Watch").with_heartbeat(config.heartbeat_interval_secs),
            heartbeat: Heartbeat::new(config.heartbeat_interval_secs),
            policy: LiveDataPolicy::from_api(client),
            overview,
            shutdown: ShutdownManager::new(),
            updates_seen: 0,
            config,
        })
    }

    fn drain_events(&mut self) {
        while let Some(event) = self.policy.try_recv_event() {
            match event {
                PolicyEvent::Started => info!("Acquisition cycle started"),
                PolicyEvent::StateChanged { from, to } => info!("Status: {} -> {}", from, to),
                PolicyEvent::ErrorRaised(message) => warn!("{}", message),
                PolicyEvent::ErrorCleared => info!("Data source recovered"),
            }
        }
    }

    fn log_status(&mut self) {
        let view = self.policy.view();
        let beat = self.heartbeat.beat();

        info!(
            "Heartbeat #{}: {} ({} symbols, {} malformed, {} reconnects)",
            beat,
            view.state,
            view.snapshots.len(),
            view.malformed_frames,
            view.reconnects
        );
        if let Some(error) = &view.error {
            info!("  Last error: {}", error);
        }

        for snapshot in view.snapshots.iter() {
            let moving_average = snapshot
                .moving_average
                .map(|ma| format!("{:.2}", ma))
                .unwrap_or_else(|| "-".to_string());
            let trend = snapshot
                .trend
                .map(|t| format!("{:?}", t).to_lowercase())
                .unwrap_or_else(|| "-".to_string());
            info!(
                "  {:<8} {:>14.2}  ma {:>14}  {}",
                snapshot.symbol, snapshot.price, moving_average, trend
            );
        }

        let overview = self.overview.state();
        match (&overview.data, &overview.error) {
            (_, Some(error)) => info!("  Overview unavailable: {}", error),
            (Some(data), None) => info!(
                "  Overview: {} streams, {:.0}ms latency, {} data points",
                data.active_streams,
                data.avg_latency_ms,
                format_compact_number(data.data_points_collected as f64)
            ),
            (None, None) => info!("  Overview loading..."),
        }

        if let Some(last) = view.last_update {
            self.updates_seen += 1;
            info!("  Last update: {}", last.format("%H:%M:%S"));
        }
    }
}

impl BinaryRunner for WatchApp {
    async fn run(&mut self) -> Result<()> {
        self.shutdown.spawn_signal_handler();
        self.policy
            .start(AcquisitionConfig::from(&self.config.acquisition))?;

        while self.shutdown.is_running() {
            self.drain_events();

            if self.heartbeat.should_beat() {
                self.log_status();
            }

            self.shutdown.interruptible_sleep(EVENT_POLL_INTERVAL).await;
        }

        self.policy.stop();
        self.overview.stop();
        self.drain_events();
        Ok(())
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }

    fn stats(&self) -> Option<String> {
        Some(format!(
            "Heartbeats: {} ({} with data)",
            self.heartbeat.count(),
            self.updates_seen
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();

    let config_path = load_config_from_env(ConfigType::Monitor);
    let config = MonitorConfig::load_or_default(&config_path)?;

    init_tracing_with_level(&config.log_level);
    config.log();

    let mut app = WatchApp::new(config)?;
    app.execute().await
}
