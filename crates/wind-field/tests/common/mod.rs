//! Common test utilities for wind-field tests
//!
//! Provides helpers for:
//! - Building the small synthetic two-dataset scenario
//! - Building a GFS-like patch for cache neighbourhood tests
//! - Catalog entries at arbitrary millisecond valid times

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use test_utils::{gfs_patch, regular_axis, small_grid};
use test_utils::{linear_u, linear_v, shear_u, shear_v};
use wind_field::{
    CatalogEntry, DatasetRef, GridAxes, InMemoryCatalog, InMemoryDecoder, WindFieldConfig,
    WindFieldEngine,
};

pub type Engine = WindFieldEngine<InMemoryDecoder, InMemoryCatalog>;

/// Catalog entry whose valid time is exactly `valid_time_ms` (forecast hour 0).
pub fn entry_at(id: &str, valid_time_ms: i64) -> CatalogEntry {
    let reference_time = Utc
        .timestamp_millis_opt(valid_time_ms)
        .single()
        .expect("valid timestamp");
    CatalogEntry::new(id, reference_time, 0)
}

pub fn early() -> DatasetRef {
    DatasetRef::new(small_grid::EARLY_DATASET, small_grid::EARLY_TIME_MS)
}

pub fn late() -> DatasetRef {
    DatasetRef::new(small_grid::LATE_DATASET, small_grid::LATE_TIME_MS)
}

/// Decoder with the linear field in the early dataset and the shear field
/// in the late one.
pub fn scenario_decoder() -> InMemoryDecoder {
    let mut decoder = InMemoryDecoder::new(
        small_grid::LATITUDES.to_vec(),
        small_grid::LONGITUDES.to_vec(),
    );
    let levels = small_grid::LEVELS;
    decoder.insert_field_fn(small_grid::EARLY_DATASET, "u", &levels, linear_u);
    decoder.insert_field_fn(small_grid::EARLY_DATASET, "v", &levels, linear_v);
    decoder.insert_field_fn(small_grid::LATE_DATASET, "u", &levels, shear_u);
    decoder.insert_field_fn(small_grid::LATE_DATASET, "v", &levels, shear_v);
    decoder
}

pub fn scenario_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(vec![
        entry_at(small_grid::EARLY_DATASET, small_grid::EARLY_TIME_MS),
        entry_at(small_grid::LATE_DATASET, small_grid::LATE_TIME_MS),
    ])
}

pub fn scenario_axes() -> GridAxes {
    GridAxes::new(
        small_grid::LATITUDES.to_vec(),
        small_grid::LONGITUDES.to_vec(),
        small_grid::LEVELS.to_vec(),
    )
    .expect("valid axes")
}

pub fn scenario_engine() -> Engine {
    WindFieldEngine::with_axes(
        WindFieldConfig::default(),
        scenario_decoder(),
        scenario_catalog(),
        scenario_axes(),
    )
    .expect("valid engine")
}

/// Decoder and axes for a single dataset on the 0.5° GFS-like patch.
pub fn patch_decoder(dataset_id: &str) -> (InMemoryDecoder, GridAxes) {
    let latitudes = regular_axis(gfs_patch::LAT_START, gfs_patch::STEP, gfs_patch::POINTS);
    let longitudes = regular_axis(gfs_patch::LON_START, gfs_patch::STEP, gfs_patch::POINTS);

    let mut decoder = InMemoryDecoder::new(latitudes.clone(), longitudes.clone());
    decoder.insert_field_fn(dataset_id, "u", &gfs_patch::LEVELS, linear_u);
    decoder.insert_field_fn(dataset_id, "v", &gfs_patch::LEVELS, linear_v);

    let axes = GridAxes::new(latitudes, longitudes, gfs_patch::LEVELS.to_vec()).expect("valid axes");
    (decoder, axes)
}
