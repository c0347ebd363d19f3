use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Price direction reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Last-update time as sent by the backend
///
/// Push frames carry epoch seconds, `/cryptos` rows carry ISO 8601 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Epoch(f64),
    Iso(String),
}

impl Timestamp {
    /// Interpret as a UTC instant, if well formed
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Epoch(secs) => {
                if !secs.is_finite() {
                    return None;
                }
                let whole = secs.floor();
                let nanos = ((secs - whole) * 1e9).round() as u32;
                Utc.timestamp_opt(whole as i64, nanos.min(999_999_999)).single()
            }
            Timestamp::Iso(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .ok(),
        }
    }
}

/// One symbol's latest known market state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub symbol: String,
    pub price: f64,
    #[serde(default, alias = "moving_avg", alias = "movingAverage")]
    pub moving_average: Option<f64>,
    #[serde(default)]
    pub trend: Option<Trend>,
    #[serde(alias = "updated_at", alias = "updatedAt")]
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_24h: Option<f64>,
}

/// Ordered per-symbol snapshot collection
///
/// Holds at most one entry per symbol. New symbols are appended in arrival
/// order; an upsert for a known symbol replaces the entry wholesale at its
/// existing position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotCollection {
    entries: Vec<Snapshot>,
    index: HashMap<String, usize>,
}

impl SnapshotCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from a full list, as returned by a poll
    pub fn from_snapshots(snapshots: Vec<Snapshot>) -> Self {
        let mut collection = Self::new();
        for snapshot in snapshots {
            collection.upsert(snapshot);
        }
        collection
    }

    /// Insert or replace by symbol
    ///
    /// Returns `true` when the symbol was new.
    pub fn upsert(&mut self, snapshot: Snapshot) -> bool {
        match self.index.get(&snapshot.symbol) {
            Some(&position) => {
                self.entries[position] = snapshot;
                false
            }
            None => {
                self.index.insert(snapshot.symbol.clone(), self.entries.len());
                self.entries.push(snapshot);
                true
            }
        }
    }

    /// Replace the whole contents with `snapshots`
    ///
    /// Symbols missing from the new list are removed. A symbol repeated in
    /// the list keeps its first position and its last value.
    pub fn replace_all(&mut self, snapshots: Vec<Snapshot>) {
        *self = Self::from_snapshots(snapshots);
    }

    pub fn get(&self, symbol: &str) -> Option<&Snapshot> {
        self.index.get(symbol).map(|&position| &self.entries[position])
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Entries in display order
    pub fn as_slice(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.entries.iter()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.symbol.as_str())
    }

    pub fn to_vec(&self) -> Vec<Snapshot> {
        self.entries.clone()
    }
}

impl<'a> IntoIterator for &'a SnapshotCollection {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
