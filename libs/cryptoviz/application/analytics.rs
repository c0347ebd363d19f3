//! Time series aggregates shown next to the charts

use crate::domain::TimeSeriesPoint;
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

/// Arithmetic mean of the point values; 0 for an empty series
pub fn calculate_average(points: &[TimeSeriesPoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64
}

/// Hour of the highest point as `HH:00` (UTC)
///
/// Ties go to the earliest point. Returns `N/A` for an empty series or when
/// the peak's timestamp cannot be parsed.
pub fn find_peak_hour(points: &[TimeSeriesPoint]) -> String {
    let Some(first) = points.first() else {
        return "N/A".to_string();
    };

    let peak = points
        .iter()
        .fold(first, |max, point| if point.value > max.value { point } else { max });

    match parse_point_time(&peak.t) {
        Some(time) => format!("{:02}:00", time.hour()),
        None => "N/A".to_string(),
    }
}

/// `1.2B`, `3.4M`, `5.6K`; plain value below one thousand
pub fn format_compact_number(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        value.to_string()
    }
}

// Offset-less timestamps are read as UTC
fn parse_point_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
