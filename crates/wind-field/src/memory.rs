//! Decoder over grids that are already in memory.
//!
//! Useful when fields have been decoded elsewhere, and for exercising the
//! engine without scientific file readers. Every dataset shares one regular
//! latitude/longitude grid; each (dataset, field, level) holds a row-major
//! array of values, one row per latitude.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::decoder::ScalarGridDecoder;
use crate::error::{Result, WindFieldError};
use crate::types::{BoundingBox, GridSample};

/// Decode handle for an [`InMemoryDecoder`] dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryHandle {
    dataset_id: String,
}

impl MemoryHandle {
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }
}

/// Number of calls served by an [`InMemoryDecoder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderCalls {
    pub opens: usize,
    pub closes: usize,
    pub fetches: usize,
}

/// Field values of one dataset, keyed by field name then level bits.
type DatasetFields = HashMap<String, BTreeMap<u64, Vec<f64>>>;

/// In-memory implementation of [`ScalarGridDecoder`].
#[derive(Debug, Default)]
pub struct InMemoryDecoder {
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    datasets: HashMap<String, DatasetFields>,
    opens: AtomicUsize,
    closes: AtomicUsize,
    fetches: AtomicUsize,
}

impl InMemoryDecoder {
    /// Create a decoder whose datasets all use the given grid coordinates.
    pub fn new(latitudes: Vec<f64>, longitudes: Vec<f64>) -> Self {
        Self {
            latitudes,
            longitudes,
            ..Default::default()
        }
    }

    /// Add one field at one level, `values` in row-major order (latitude rows).
    pub fn insert_field(
        &mut self,
        dataset_id: &str,
        field: &str,
        level: f64,
        values: Vec<f64>,
    ) -> Result<()> {
        let expected = self.latitudes.len() * self.longitudes.len();
        if values.len() != expected {
            return Err(WindFieldError::configuration(format!(
                "field '{field}' at {level} hPa has {} values, grid has {expected}",
                values.len()
            )));
        }

        self.datasets
            .entry(dataset_id.to_string())
            .or_default()
            .entry(field.to_string())
            .or_default()
            .insert(level.to_bits(), values);
        Ok(())
    }

    /// Add a field at several levels, evaluating `f(latitude, longitude, level)`
    /// at every grid point.
    pub fn insert_field_fn<F>(&mut self, dataset_id: &str, field: &str, levels: &[f64], f: F)
    where
        F: Fn(f64, f64, f64) -> f64,
    {
        for &level in levels {
            let values = self
                .latitudes
                .iter()
                .flat_map(|&lat| self.longitudes.iter().map(move |&lon| (lat, lon)))
                .map(|(lat, lon)| f(lat, lon, level))
                .collect::<Vec<_>>();
            self.datasets
                .entry(dataset_id.to_string())
                .or_default()
                .entry(field.to_string())
                .or_default()
                .insert(level.to_bits(), values);
        }
    }

    pub fn calls(&self) -> DecoderCalls {
        DecoderCalls {
            opens: self.opens.load(Ordering::Relaxed),
            closes: self.closes.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
        }
    }

    fn field(&self, handle: &MemoryHandle, field: &str) -> Result<&BTreeMap<u64, Vec<f64>>> {
        self.datasets
            .get(&handle.dataset_id)
            .and_then(|fields| fields.get(field))
            .ok_or_else(|| {
                WindFieldError::decoder(format!(
                    "field '{field}' not present in dataset {}",
                    handle.dataset_id
                ))
            })
    }
}

#[async_trait]
impl ScalarGridDecoder for InMemoryDecoder {
    type Handle = MemoryHandle;

    async fn open(&self, dataset_id: &str) -> Result<MemoryHandle> {
        if !self.datasets.contains_key(dataset_id) {
            return Err(WindFieldError::decoder(format!(
                "dataset {dataset_id} not found"
            )));
        }
        self.opens.fetch_add(1, Ordering::Relaxed);
        Ok(MemoryHandle {
            dataset_id: dataset_id.to_string(),
        })
    }

    async fn close(&self, _handle: MemoryHandle) -> Result<()> {
        self.closes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn levels(&self, handle: &MemoryHandle, field: &str) -> Result<Vec<f64>> {
        Ok(self
            .field(handle, field)?
            .keys()
            .map(|&bits| f64::from_bits(bits))
            .collect())
    }

    async fn coordinates(
        &self,
        handle: &MemoryHandle,
        field: &str,
        _level: f64,
    ) -> Result<(Vec<f64>, Vec<f64>)> {
        self.field(handle, field)?;
        Ok((self.latitudes.clone(), self.longitudes.clone()))
    }

    async fn fetch(
        &self,
        handle: &MemoryHandle,
        field: &str,
        level: f64,
        bbox: &BoundingBox,
    ) -> Result<Vec<GridSample>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let values = self.field(handle, field)?.get(&level.to_bits()).ok_or_else(|| {
            WindFieldError::decoder(format!(
                "field '{field}' has no level {level} in dataset {}",
                handle.dataset_id
            ))
        })?;

        let width = self.longitudes.len();
        let mut samples = Vec::new();
        for (row, &lat) in self.latitudes.iter().enumerate() {
            for (col, &lon) in self.longitudes.iter().enumerate() {
                if bbox.contains(lon, lat) {
                    samples.push(GridSample::new(values[row * width + col], lat, lon));
                }
            }
        }
        Ok(samples)
    }
}
