//! Per-dataset sample cache with neighbourhood pre-fetch.

use tokio::sync::Mutex;
use tracing::debug;

use crate::axes::GridAxes;
use crate::decoder::ScalarGridDecoder;
use crate::error::{Result, WindFieldError};
use crate::types::{BoundingBox, CacheStats, GridPoint};

use super::SampleCache;

/// What a cache miss pre-fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct PreloadPolicy {
    /// Half-width of the fetched box, in degrees.
    pub range_deg: f64,
    /// Fields fetched together on every miss.
    pub fields: Vec<String>,
}

impl PreloadPolicy {
    pub fn new(range_deg: f64, fields: Vec<String>) -> Self {
        Self { range_deg, fields }
    }

    fn fields_with<'a>(&'a self, requested: &'a str) -> Vec<&'a str> {
        let mut fields: Vec<&str> = self.fields.iter().map(String::as_str).collect();
        if !fields.contains(&requested) {
            fields.push(requested);
        }
        fields
    }
}

/// An open dataset: its decode handle plus the samples decoded from it.
///
/// The sample map sits behind an async mutex that is held across the
/// check, fill and re-read of a miss, so concurrent queries never decode
/// the same neighbourhood twice.
pub struct DatasetCache<H> {
    dataset_id: String,
    handle: H,
    samples: Mutex<SampleCache>,
}

impl<H: Send + Sync> DatasetCache<H> {
    pub fn new(dataset_id: impl Into<String>, handle: H) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            handle,
            samples: Mutex::new(SampleCache::new()),
        }
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Give back the decode handle so it can be closed.
    pub fn into_handle(self) -> H {
        self.handle
    }

    pub async fn stats(&self) -> CacheStats {
        self.samples.lock().await.stats()
    }

    /// Read one sample, filling the surrounding neighbourhood on a miss.
    ///
    /// `point` must be an exact grid coordinate (longitude on the grid axis,
    /// level one of `axes.levels()`). A miss fetches a box of half-width
    /// `policy.range_deg` around it for every level and every policy field.
    pub async fn sample<D>(
        &self,
        decoder: &D,
        axes: &GridAxes,
        policy: &PreloadPolicy,
        point: GridPoint,
        field: &str,
    ) -> Result<f64>
    where
        D: ScalarGridDecoder<Handle = H> + ?Sized,
    {
        let mut samples = self.samples.lock().await;
        if let Some(value) = samples.get(field, point) {
            return Ok(value);
        }

        self.fill(decoder, axes, policy, &mut samples, point, field)
            .await?;

        samples
            .peek(field, point)
            .ok_or_else(|| WindFieldError::GridPointMissing {
                dataset: self.dataset_id.clone(),
                field: field.to_string(),
                latitude: point.latitude,
                longitude: point.longitude,
                level: point.level,
            })
    }

    async fn fill<D>(
        &self,
        decoder: &D,
        axes: &GridAxes,
        policy: &PreloadPolicy,
        samples: &mut SampleCache,
        point: GridPoint,
        field: &str,
    ) -> Result<()>
    where
        D: ScalarGridDecoder<Handle = H> + ?Sized,
    {
        let bbox = BoundingBox::around(point.latitude, point.longitude, policy.range_deg);
        let fields = policy.fields_with(field);
        let mut inserted = 0usize;

        for &level in axes.levels() {
            for &name in &fields {
                let batch = decoder.fetch(&self.handle, name, level, &bbox).await?;
                inserted += samples.insert_batch(name, level, batch);
            }
        }
        samples.record_fill();

        debug!(
            dataset = %self.dataset_id,
            latitude = point.latitude,
            longitude = point.longitude,
            levels = axes.levels().len(),
            fields = fields.len(),
            inserted,
            cached = samples.len(),
            "Filled sample cache neighbourhood"
        );

        Ok(())
    }
}

impl<H> std::fmt::Debug for DatasetCache<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetCache")
            .field("dataset_id", &self.dataset_id)
            .finish_non_exhaustive()
    }
}
