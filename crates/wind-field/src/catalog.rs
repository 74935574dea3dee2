//! Dataset catalog trait and entries.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::timeline::DatasetRef;

/// One forecast file known to the catalog.
///
/// Combines the model run (reference) time and the forecast hour offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Identifier passed to the decoder (URL, path or key).
    pub id: String,
    /// Model run time.
    pub reference_time: DateTime<Utc>,
    /// Forecast hour offset from the reference time.
    pub forecast_hour: u32,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, reference_time: DateTime<Utc>, forecast_hour: u32) -> Self {
        Self {
            id: id.into(),
            reference_time,
            forecast_hour,
        }
    }

    /// Reference time plus forecast offset.
    pub fn valid_time(&self) -> DateTime<Utc> {
        self.reference_time + Duration::hours(i64::from(self.forecast_hour))
    }

    /// Valid time in milliseconds since the Unix epoch.
    pub fn valid_time_ms(&self) -> i64 {
        self.valid_time().timestamp_millis()
    }

    pub fn to_dataset_ref(&self) -> DatasetRef {
        DatasetRef::new(self.id.clone(), self.valid_time_ms())
    }
}

/// Source of forecast datasets around a point in time.
#[async_trait]
pub trait DatasetCatalog: Send + Sync {
    /// Datasets that may bracket `timestamp_ms`, in any order.
    ///
    /// Implementations may return their whole index; the engine filters by
    /// forecast hour and sorts by valid time. Called once per query, so it
    /// should be cheap. The engine only rebuilds its time index when the
    /// returned entries change.
    async fn resolve(&self, timestamp_ms: i64) -> Result<Vec<CatalogEntry>>;
}

/// Catalog over a fixed list of entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    entries: Vec<CatalogEntry>,
}

impl InMemoryCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

#[async_trait]
impl DatasetCatalog for InMemoryCatalog {
    async fn resolve(&self, _timestamp_ms: i64) -> Result<Vec<CatalogEntry>> {
        Ok(self.entries.clone())
    }
}
