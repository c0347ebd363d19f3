//! Export a `/history` series to CSV or JSON
//!
//! Usage: `cryptoviz-export <csv|json> [file] [metric] [range] [interval]`

use anyhow::{bail, Context, Result};
use cryptoviz::application::{calculate_average, find_peak_hour, write_export, ExportFormat};
use cryptoviz::domain::HistoryMetric;
use cryptoviz::{init_tracing_with_level, ApiClient, MonitorConfig};
use cryptoviz_monitor::bin_common::{load_config_from_env, load_dotenv, parse_args, ConfigType};
use std::path::PathBuf;
use tracing::info;

struct ExportArgs {
    format: ExportFormat,
    file: Option<PathBuf>,
    metric: HistoryMetric,
    range: String,
    interval: String,
}

impl ExportArgs {
    fn parse(args: &[String]) -> Result<Self> {
        let Some(format) = args.first() else {
            bail!("usage: cryptoviz-export <csv|json> [file] [metric] [range] [interval]");
        };

        let metric = match args.get(2) {
            Some(raw) => raw.parse::<HistoryMetric>().map_err(anyhow::Error::msg)?,
            None => HistoryMetric::default(),
        };

        Ok(Self {
            format: format.parse().map_err(anyhow::Error::msg)?,
            file: args.get(1).map(PathBuf::from),
            metric,
            range: args.get(3).cloned().unwrap_or_else(|| "30d".to_string()),
            interval: args.get(4).cloned().unwrap_or_else(|| "1d".to_string()),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();

    let args = ExportArgs::parse(&parse_args())?;
    let config = MonitorConfig::load_or_default(load_config_from_env(ConfigType::Monitor))?;
    init_tracing_with_level(&config.log_level);

    let client = ApiClient::with_timeout(&config.api_base_url, config.request_timeout())?;

    info!(
        "Fetching {} history (range={}, interval={})",
        args.metric.as_str(),
        args.range,
        args.interval
    );
    let history = client
        .history(args.metric, &args.range, &args.interval)
        .await
        .with_context(|| format!("fetching history from {}", client.base_url()))?;

    info!(
        "{} points, average {:.2}, peak hour {}",
        history.points.len(),
        calculate_average(&history.points),
        find_peak_hour(&history.points)
    );

    let written = write_export(args.format, &history.points, args.file.as_deref())?;
    info!("Wrote {}", written.display());

    Ok(())
}
