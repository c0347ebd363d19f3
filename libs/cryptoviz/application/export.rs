//! CSV and JSON export of time series

use crate::domain::TimeSeriesPoint;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_CSV_FILENAME: &str = "export.csv";
pub const DEFAULT_JSON_FILENAME: &str = "export.json";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize export: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn default_filename(self) -> &'static str {
        match self {
            ExportFormat::Csv => DEFAULT_CSV_FILENAME,
            ExportFormat::Json => DEFAULT_JSON_FILENAME,
        }
    }

    pub fn render(self, points: &[TimeSeriesPoint]) -> Result<String> {
        match self {
            ExportFormat::Csv => Ok(to_csv(points)),
            ExportFormat::Json => to_json(points),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format '{}' (expected csv or json)", other)),
        }
    }
}

/// `timestamp,value` header then one unquoted `t,value` row per point
pub fn to_csv(points: &[TimeSeriesPoint]) -> String {
    std::iter::once("timestamp,value".to_string())
        .chain(points.iter().map(|p| format!("{},{}", p.t, p.value)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty-printed JSON array, two-space indent
pub fn to_json(points: &[TimeSeriesPoint]) -> Result<String> {
    Ok(serde_json::to_string_pretty(points)?)
}

/// Render and write `points`, returning the path written
///
/// `path` defaults to the format's default filename in the working directory.
pub fn write_export(format: ExportFormat, points: &[TimeSeriesPoint], path: Option<&Path>) -> Result<PathBuf> {
    let target = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format.default_filename()));

    std::fs::write(&target, format.render(points)?)?;
    info!("Exported {} points to {}", points.len(), target.display());
    Ok(target)
}

pub fn write_csv(points: &[TimeSeriesPoint], path: Option<&Path>) -> Result<PathBuf> {
    write_export(ExportFormat::Csv, points, path)
}

pub fn write_json(points: &[TimeSeriesPoint], path: Option<&Path>) -> Result<PathBuf> {
    write_export(ExportFormat::Json, points, path)
}
