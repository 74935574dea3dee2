//! Scalar grid decoder trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BoundingBox, GridSample};

/// Capability to read named scalar fields out of a forecast dataset.
///
/// The engine never parses a file format itself. Implementations wrap a
/// GRIB/NetCDF reader (or already-decoded data) and hand back plain
/// `(value, latitude, longitude)` samples for one field at one level.
///
/// Longitudes exchanged through this trait use the grid convention
/// ([0, 360) after the +180 shift applied to query longitudes).
#[async_trait]
pub trait ScalarGridDecoder: Send + Sync {
    /// Open decode resource for one dataset.
    type Handle: Send + Sync;

    /// Open the dataset with the given identifier.
    ///
    /// The engine calls this at most once per identifier until the dataset
    /// is released.
    async fn open(&self, dataset_id: &str) -> Result<Self::Handle>;

    /// Release the decode resource.
    async fn close(&self, handle: Self::Handle) -> Result<()>;

    /// Isobaric levels (hPa) at which `field` is present.
    async fn levels(&self, handle: &Self::Handle, field: &str) -> Result<Vec<f64>>;

    /// Latitude and longitude coordinates of the grid carrying `field` at `level`.
    async fn coordinates(
        &self,
        handle: &Self::Handle,
        field: &str,
        level: f64,
    ) -> Result<(Vec<f64>, Vec<f64>)>;

    /// Every grid sample of `field` at `level` that falls inside `bbox`.
    async fn fetch(
        &self,
        handle: &Self::Handle,
        field: &str,
        level: f64,
        bbox: &BoundingBox,
    ) -> Result<Vec<GridSample>>;
}

/// A shared decoder, so several engines can read through one instance.
#[async_trait]
impl<D: ScalarGridDecoder + ?Sized> ScalarGridDecoder for Arc<D> {
    type Handle = D::Handle;

    async fn open(&self, dataset_id: &str) -> Result<Self::Handle> {
        (**self).open(dataset_id).await
    }

    async fn close(&self, handle: Self::Handle) -> Result<()> {
        (**self).close(handle).await
    }

    async fn levels(&self, handle: &Self::Handle, field: &str) -> Result<Vec<f64>> {
        (**self).levels(handle, field).await
    }

    async fn coordinates(
        &self,
        handle: &Self::Handle,
        field: &str,
        level: f64,
    ) -> Result<(Vec<f64>, Vec<f64>)> {
        (**self).coordinates(handle, field, level).await
    }

    async fn fetch(
        &self,
        handle: &Self::Handle,
        field: &str,
        level: f64,
        bbox: &BoundingBox,
    ) -> Result<Vec<GridSample>> {
        (**self).fetch(handle, field, level, bbox).await
    }
}
