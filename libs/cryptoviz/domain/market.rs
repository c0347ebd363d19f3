//! Backend response payloads
//!
//! Field names follow the backend's camelCase JSON.

use serde::{Deserialize, Serialize};

/// `/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, alias = "uptime_seconds")]
    pub uptime_seconds: Option<f64>,
}

impl HealthResponse {
    /// Uptime split into whole hours and minutes
    pub fn uptime_hours_minutes(&self) -> Option<(u64, u64)> {
        self.uptime_seconds.map(|secs| {
            let secs = secs.max(0.0) as u64;
            (secs / 3600, (secs % 3600) / 60)
        })
    }
}

/// `/overview`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub active_streams: u64,
    pub last_update: String,
    pub avg_latency_ms: f64,
    pub data_points_collected: u64,
}

/// One time series sample; `t` is an ISO 8601 timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub t: String,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(t: impl Into<String>, value: f64) -> Self {
        Self { t: t.into(), value }
    }
}

/// `/mentions/timeseries`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesResponse {
    #[serde(default)]
    pub window: Option<String>,
    #[serde(default)]
    pub interval: Option<String>,
    pub points: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// One news item from `/events/recent`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEvent {
    pub symbol: String,
    pub sentiment: Sentiment,
    pub title: String,
    pub source: String,
    pub published_at: String,
}

/// `/events/recent`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEventsResponse {
    pub items: Vec<RecentEvent>,
}

/// Ranking metric for `/trends/top`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendMetric {
    Mentions,
    PriceChange,
}

impl TrendMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendMetric::Mentions => "mentions",
            TrendMetric::PriceChange => "priceChange",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendItem {
    pub symbol: String,
    pub value: f64,
    #[serde(default)]
    pub change_pct: Option<f64>,
}

/// `/trends/top`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendsResponse {
    pub metric: TrendMetric,
    #[serde(default)]
    pub window: Option<String>,
    pub items: Vec<TrendItem>,
}

/// `/sentiment/summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSummary {
    #[serde(default)]
    pub window: Option<String>,
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
    #[serde(default)]
    pub total_items: Option<u64>,
}

/// Series selector for `/history`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryMetric {
    #[default]
    NewsVolume,
    MentionsVolume,
}

impl HistoryMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryMetric::NewsVolume => "newsVolume",
            HistoryMetric::MentionsVolume => "mentionsVolume",
        }
    }
}

impl std::str::FromStr for HistoryMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newsVolume" => Ok(HistoryMetric::NewsVolume),
            "mentionsVolume" => Ok(HistoryMetric::MentionsVolume),
            other => Err(format!(
                "unknown history metric '{}' (expected newsVolume or mentionsVolume)",
                other
            )),
        }
    }
}

/// `/history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub metric: HistoryMetric,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub interval: Option<String>,
    pub points: Vec<TimeSeriesPoint>,
}
