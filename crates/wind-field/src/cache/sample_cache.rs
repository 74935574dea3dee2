//! Unbounded map of decoded samples for a single dataset.

use std::collections::HashMap;

use crate::types::{CacheStats, GridPoint, GridSample};

/// Exact grid coordinate of one decoded value.
///
/// Coordinates are stored as their bit patterns so the key is hashable;
/// `-0.0` is folded into `0.0` so both spellings of the equator and the
/// prime meridian hit the same entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PointKey {
    latitude: u64,
    longitude: u64,
    level: u64,
}

impl PointKey {
    fn new(point: GridPoint) -> Self {
        Self {
            latitude: coordinate_bits(point.latitude),
            longitude: coordinate_bits(point.longitude),
            level: coordinate_bits(point.level),
        }
    }
}

fn coordinate_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Sample store with hit/miss accounting.
///
/// Values are grouped per field, so a field name is stored once per dataset
/// rather than once per sample. There is no eviction: entries live until the
/// owning dataset is released.
#[derive(Debug, Default)]
pub struct SampleCache {
    fields: HashMap<String, HashMap<PointKey, f64>>,
    hits: u64,
    misses: u64,
    fills: u64,
}

impl SampleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a sample, counting the hit or miss.
    pub fn get(&mut self, field: &str, point: GridPoint) -> Option<f64> {
        match self.peek(field, point) {
            Some(value) => {
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Look up a sample without touching the counters.
    pub fn peek(&self, field: &str, point: GridPoint) -> Option<f64> {
        self.fields
            .get(field)
            .and_then(|samples| samples.get(&PointKey::new(point)))
            .copied()
    }

    /// Store every sample of one decoded (field, level) batch. Returns how
    /// many samples the batch held.
    pub fn insert_batch(&mut self, field: &str, level: f64, batch: Vec<GridSample>) -> usize {
        let count = batch.len();
        let samples = self.fields.entry(field.to_string()).or_default();
        samples.reserve(count);
        for sample in batch {
            let at = GridPoint::new(sample.latitude, sample.longitude, level);
            samples.insert(PointKey::new(at), sample.value);
        }
        count
    }

    /// Count one neighbourhood fill.
    pub fn record_fill(&mut self) {
        self.fills += 1;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            fills: self.fills,
            entries: self.len(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.fields.values().map(HashMap::len).sum()
    }
}
