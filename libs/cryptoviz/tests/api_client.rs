//! Integration test: REST client against a mock backend

use cryptoviz::domain::{HistoryMetric, Sentiment, Timestamp, TrendMetric};
use cryptoviz::{
    AcquisitionConfig, ApiClient, ApiError, ConnectionState, LiveDataPolicy, SnapshotSource,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_timeout(server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_health_and_overview() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "uptimeSeconds": 3720})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "activeStreams": 4,
            "lastUpdate": "2026-02-06T01:03:35Z",
            "avgLatencyMs": 42.5,
            "dataPointsCollected": 1250000
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.uptime_hours_minutes(), Some((1, 2)));

    let overview = client.overview().await.unwrap();
    assert_eq!(overview.active_streams, 4);
    assert_eq!(overview.data_points_collected, 1_250_000);
}

#[tokio::test]
async fn test_default_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mentions/timeseries"))
        .and(query_param("window", "60m"))
        .and(query_param("interval", "1m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "window": "60m",
            "interval": "1m",
            "points": [{"t": "2026-02-06T01:00:00Z", "value": 3}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/events/recent"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "symbol": "BTC",
                "sentiment": "positive",
                "title": "ETF inflows",
                "source": "wire",
                "publishedAt": "2026-02-06T01:03:35Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/trends/top"))
        .and(query_param("metric", "priceChange"))
        .and(query_param("window", "1h"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metric": "priceChange",
            "items": [{"symbol": "SOL", "value": 8.1, "changePct": 8.1}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sentiment/summary"))
        .and(query_param("window", "1h"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "positivePct": 50.0, "neutralPct": 30.0, "negativePct": 20.0, "totalItems": 10
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/history"))
        .and(query_param("metric", "newsVolume"))
        .and(query_param("range", "30d"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metric": "newsVolume",
            "points": [{"t": "2026-02-05T00:00:00Z", "value": 120}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    assert_eq!(client.mentions_timeseries_default().await.unwrap().points.len(), 1);
    assert_eq!(
        client.recent_events_default().await.unwrap().items[0].sentiment,
        Sentiment::Positive
    );
    assert_eq!(
        client.trends_top_default(TrendMetric::PriceChange).await.unwrap().items[0].symbol,
        "SOL"
    );
    assert_eq!(client.sentiment_summary_default().await.unwrap().total_items, Some(10));
    let history = client.history_default().await.unwrap();
    assert_eq!(history.metric, HistoryMetric::NewsVolume);
    assert_eq!(history.points[0].value, 120.0);
}

#[tokio::test]
async fn test_cryptos_rows_decode_as_snapshots() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cryptos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"symbol": "BTC", "price": 64000.0, "market_cap": 1.2e12, "volume_24h": 3.1e10,
             "moving_avg": 63500.0, "trend": "up", "updated_at": "2026-02-06T01:03:35Z"},
            {"symbol": "ETH", "price": 3100.0, "updated_at": "2026-02-06T01:03:35Z"}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let rows = client.fetch_snapshots().await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].moving_average, Some(63_500.0));
    assert_eq!(rows[1].trend, None);
    assert_eq!(rows[1].timestamp, Timestamp::Iso("2026-02-06T01:03:35Z".into()));
}

#[tokio::test]
async fn test_http_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cryptos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).await.cryptos().await.unwrap_err();

    assert_eq!(err.status(), 500);
    assert_eq!(err.to_string(), "API Error: Internal Server Error");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.overview().await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
    assert_eq!(err.status(), 0);
}

#[tokio::test]
async fn test_transport_failure_has_status_zero() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::with_timeout(format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    let err = client.health().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), 0);
}

#[tokio::test]
async fn test_policy_polls_when_backend_has_no_push_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cryptos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"symbol": "BTC", "price": 64000.0, "updated_at": "2026-02-06T01:03:35Z"}
        ])))
        .mount(&server)
        .await;

    let mut policy = LiveDataPolicy::from_api(client_for(&server).await);
    policy
        .start(AcquisitionConfig::default().with_poll_interval(Duration::from_millis(100)))
        .unwrap();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while policy.snapshots().is_empty() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(policy.connection_state(), ConnectionState::Degraded);
    assert_eq!(policy.snapshots()[0].symbol, "BTC");
    policy.stop();
}
