//! Registry of open datasets.
//!
//! Each dataset is opened at most once, keyed by identifier, and stays open
//! with its sample cache until it is explicitly released.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::decoder::ScalarGridDecoder;
use crate::error::{Result, WindFieldError};
use crate::cache::DatasetCache;
use crate::types::CacheStats;

/// Owned map from dataset identifier to its decode handle and cache.
pub struct DatasetRegistry<D: ScalarGridDecoder> {
    decoder: D,
    open: RwLock<HashMap<String, Arc<DatasetCache<D::Handle>>>>,
}

impl<D: ScalarGridDecoder> DatasetRegistry<D> {
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            open: RwLock::new(HashMap::new()),
        }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Get the open dataset, opening it on first use.
    pub async fn acquire(&self, dataset_id: &str) -> Result<Arc<DatasetCache<D::Handle>>> {
        if let Some(entry) = self.open.read().await.get(dataset_id) {
            return Ok(entry.clone());
        }

        let mut open = self.open.write().await;
        // Another task may have opened it while we waited for the write lock
        if let Some(entry) = open.get(dataset_id) {
            return Ok(entry.clone());
        }

        let handle = self.decoder.open(dataset_id).await?;
        let entry = Arc::new(DatasetCache::new(dataset_id, handle));
        open.insert(dataset_id.to_string(), entry.clone());

        info!(dataset = dataset_id, open = open.len(), "Opened dataset");
        Ok(entry)
    }

    pub async fn is_open(&self, dataset_id: &str) -> bool {
        self.open.read().await.contains_key(dataset_id)
    }

    /// Identifiers of the currently open datasets, sorted.
    pub async fn open_datasets(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.open.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Close one dataset and drop its cache.
    ///
    /// Returns `Ok(false)` if the dataset was not open. Fails without closing
    /// anything if a query still holds the dataset.
    pub async fn release(&self, dataset_id: &str) -> Result<bool> {
        let mut open = self.open.write().await;
        let Some(entry) = open.remove(dataset_id) else {
            return Ok(false);
        };

        match Arc::try_unwrap(entry) {
            Ok(cache) => {
                let stats = cache.stats().await;
                self.decoder.close(cache.into_handle()).await?;
                info!(
                    dataset = dataset_id,
                    hits = stats.hits,
                    misses = stats.misses,
                    entries = stats.entries,
                    "Released dataset"
                );
                Ok(true)
            }
            Err(shared) => {
                open.insert(dataset_id.to_string(), shared);
                Err(WindFieldError::configuration(format!(
                    "dataset {dataset_id} is still in use and cannot be released"
                )))
            }
        }
    }

    /// Close every open dataset.
    ///
    /// Attempts every close and returns the first failure.
    pub async fn release_all(&self) -> Result<usize> {
        let ids = self.open_datasets().await;
        let mut released = 0;
        let mut first_error = None;

        for id in ids {
            match self.release(&id).await {
                Ok(true) => released += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(dataset = %id, error = %e, "Failed to release dataset");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(released),
        }
    }

    /// Cache statistics summed over all open datasets.
    pub async fn cache_stats(&self) -> CacheStats {
        let entries: Vec<_> = self.open.read().await.values().cloned().collect();
        let mut total = CacheStats::default();
        for entry in entries {
            total = total.merge(&entry.stats().await);
        }
        total
    }
}
