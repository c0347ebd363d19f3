use crate::domain::{
    HealthResponse, HistoryMetric, HistoryResponse, OverviewResponse, RecentEventsResponse,
    SentimentSummary, Snapshot, TimeSeriesResponse, TrendMetric, TrendsResponse,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// REST failure with the status code the dashboard displays
///
/// Transport and decode failures report status 0.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),

    #[error("API Error: {reason}")]
    Status { status: u16, reason: String },

    #[error("Deserialization failed: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Status { status, .. } => *status,
            ApiError::Transport(_) | ApiError::Decode(_) => 0,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// CryptoViz backend REST client
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Client with the default request timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Push channel address for this backend
    pub fn push_url(&self) -> pushsockets::Result<String> {
        pushsockets::push_url(&self.base_url)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.get("/health", &[]).await
    }

    pub async fn overview(&self) -> Result<OverviewResponse> {
        self.get("/overview", &[]).await
    }

    /// Mention counts, e.g. `window = "60m"`, `interval = "1m"`
    pub async fn mentions_timeseries(&self, window: &str, interval: &str) -> Result<TimeSeriesResponse> {
        self.get(
            "/mentions/timeseries",
            &[("window", window.to_string()), ("interval", interval.to_string())],
        )
        .await
    }

    pub async fn recent_events(&self, limit: u32) -> Result<RecentEventsResponse> {
        self.get("/events/recent", &[("limit", limit.to_string())]).await
    }

    pub async fn trends_top(&self, metric: TrendMetric, window: &str, limit: u32) -> Result<TrendsResponse> {
        self.get(
            "/trends/top",
            &[
                ("metric", metric.as_str().to_string()),
                ("window", window.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    pub async fn sentiment_summary(&self, window: &str) -> Result<SentimentSummary> {
        self.get("/sentiment/summary", &[("window", window.to_string())]).await
    }

    pub async fn history(&self, metric: HistoryMetric, range: &str, interval: &str) -> Result<HistoryResponse> {
        self.get(
            "/history",
            &[
                ("metric", metric.as_str().to_string()),
                ("range", range.to_string()),
                ("interval", interval.to_string()),
            ],
        )
        .await
    }

    /// Current snapshot of every tracked symbol
    pub async fn cryptos(&self) -> Result<Vec<Snapshot>> {
        self.get("/cryptos", &[]).await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        debug!("GET {} with {} params", url, params.len());

        let mut request = self.client.get(&url);
        if !params.is_empty() {
            request = request.query(params);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown error").to_string();
            debug!("GET {} failed with {}", url, status);
            return Err(ApiError::Status {
                status: status.as_u16(),
                reason,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

// Convenience wrappers using the dashboard's default query values
impl ApiClient {
    pub async fn mentions_timeseries_default(&self) -> Result<TimeSeriesResponse> {
        self.mentions_timeseries("60m", "1m").await
    }

    pub async fn recent_events_default(&self) -> Result<RecentEventsResponse> {
        self.recent_events(20).await
    }

    pub async fn trends_top_default(&self, metric: TrendMetric) -> Result<TrendsResponse> {
        self.trends_top(metric, "1h", 5).await
    }

    pub async fn sentiment_summary_default(&self) -> Result<SentimentSummary> {
        self.sentiment_summary("1h").await
    }

    pub async fn history_default(&self) -> Result<HistoryResponse> {
        self.history(HistoryMetric::NewsVolume, "30d", "1d").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.push_url().unwrap(), "ws://localhost:8000/ws");
    }

    #[test]
    fn test_error_status_codes() {
        let status = ApiError::Status {
            status: 503,
            reason: "Service Unavailable".into(),
        };
        assert_eq!(status.status(), 503);
        assert_eq!(status.to_string(), "API Error: Service Unavailable");
        assert_eq!(ApiError::Transport("connection refused".into()).status(), 0);
        assert_eq!(ApiError::Decode("eof".into()).status(), 0);
    }
}
