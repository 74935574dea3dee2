//! Dataset time index: which two datasets bracket a timestamp.

use serde::{Deserialize, Serialize};

use crate::axes::percent;
use crate::catalog::CatalogEntry;
use crate::error::{Result, WindFieldError};

/// A forecast snapshot: decoder identifier plus valid time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetRef {
    pub id: String,
    /// Valid time in milliseconds since the Unix epoch.
    pub valid_time_ms: i64,
}

impl DatasetRef {
    pub fn new(id: impl Into<String>, valid_time_ms: i64) -> Self {
        Self {
            id: id.into(),
            valid_time_ms,
        }
    }
}

/// The earlier and later dataset around a timestamp.
///
/// Both are the same dataset when the timestamp lies on or beyond an end of
/// the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetBracket {
    pub earlier: DatasetRef,
    pub later: DatasetRef,
}

impl DatasetBracket {
    pub fn is_degenerate(&self) -> bool {
        self.earlier.valid_time_ms == self.later.valid_time_ms
    }

    /// Weight of the earlier dataset for `timestamp_ms`.
    pub fn percent(&self, timestamp_ms: i64) -> f64 {
        percent(
            timestamp_ms as f64,
            self.earlier.valid_time_ms as f64,
            self.later.valid_time_ms as f64,
        )
    }
}

/// Datasets sorted ascending by valid time.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetTimeIndex {
    datasets: Vec<DatasetRef>,
}

impl DatasetTimeIndex {
    /// Build an index from dataset references. Fails if `datasets` is empty.
    pub fn new(mut datasets: Vec<DatasetRef>) -> Result<Self> {
        if datasets.is_empty() {
            return Err(WindFieldError::configuration("dataset catalog is empty"));
        }
        datasets.sort_by_key(|d| d.valid_time_ms);
        Ok(Self { datasets })
    }

    /// Build an index from catalog entries, keeping only usable forecast hours.
    ///
    /// When two entries share a valid time, the one with the shorter forecast
    /// hour (the fresher run) wins.
    pub fn from_entries(mut entries: Vec<CatalogEntry>, usable_forecast_hours: &[u32]) -> Result<Self> {
        entries.retain(|e| usable_forecast_hours.contains(&e.forecast_hour));
        entries.sort_by_key(|e| (e.valid_time_ms(), e.forecast_hour));
        entries.dedup_by_key(|e| e.valid_time_ms());

        Self::new(entries.iter().map(CatalogEntry::to_dataset_ref).collect())
    }

    /// Find the datasets surrounding `timestamp_ms`.
    pub fn bracket(&self, timestamp_ms: i64) -> DatasetBracket {
        let idx = self
            .datasets
            .partition_point(|d| d.valid_time_ms <= timestamp_ms);
        DatasetBracket {
            earlier: self.datasets[idx.saturating_sub(1)].clone(),
            later: self.datasets[idx.min(self.datasets.len() - 1)].clone(),
        }
    }

    pub fn datasets(&self) -> &[DatasetRef] {
        &self.datasets
    }
}
