//! Time bracketing over a GFS-style catalog of model runs.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use common::*;
use test_utils::small_grid;
use test_utils::time::{FORECAST_HOURS, GFS_CYCLES, HOUR_MS};
use tokio_test::{assert_err, assert_ok};
use wind_field::{
    CatalogEntry, DatasetCatalog, ErrorKind, InMemoryCatalog, WindFieldConfig, WindFieldEngine,
};

fn day_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid date")
}

/// Every cycle of one day with every published forecast hour.
fn gfs_day() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::default();
    for cycle in GFS_CYCLES {
        let reference_time = day_start() + Duration::hours(i64::from(cycle));
        for hour in FORECAST_HOURS {
            let id = format!("gfs_20240101_{cycle:02}_f{hour:03}");
            catalog.push(CatalogEntry::new(id, reference_time, hour));
        }
    }
    catalog
}

fn engine_with(config: WindFieldConfig) -> Engine {
    assert_ok!(WindFieldEngine::with_axes(
        config,
        scenario_decoder(),
        gfs_day(),
        scenario_axes()
    ))
}

fn at_hour(hours: f64) -> i64 {
    day_start().timestamp_millis() + (hours * HOUR_MS as f64) as i64
}

#[tokio::test]
async fn test_default_hours_use_analysis_and_first_step() {
    let engine = engine_with(WindFieldConfig::default());

    let bracket = assert_ok!(engine.bracket_datasets(at_hour(4.5)).await);
    assert_eq!(bracket.earlier.id, "gfs_20240101_00_f003");
    assert_eq!(bracket.later.id, "gfs_20240101_06_f000");
    assert_eq!(bracket.percent(at_hour(4.5)), 0.5);

    let bracket = assert_ok!(engine.bracket_datasets(at_hour(19.0)).await);
    assert_eq!(bracket.earlier.id, "gfs_20240101_18_f000");
    assert_eq!(bracket.later.id, "gfs_20240101_18_f003");
    assert!((bracket.percent(at_hour(19.0)) - 2.0 / 3.0).abs() < 1e-12);
}

#[tokio::test]
async fn test_shared_valid_time_prefers_fresher_run() {
    let config = WindFieldConfig {
        usable_forecast_hours: FORECAST_HOURS.to_vec(),
        ..Default::default()
    };
    let engine = engine_with(config);

    // 06Z is both the 00Z f006 and the 06Z analysis
    let bracket = assert_ok!(engine.bracket_datasets(at_hour(7.5)).await);
    assert_eq!(bracket.earlier.id, "gfs_20240101_06_f000");
    assert_eq!(bracket.later.id, "gfs_20240101_06_f003");

    // 27Z only exists as the 18Z f009
    let bracket = assert_ok!(engine.bracket_datasets(at_hour(26.0)).await);
    assert_eq!(bracket.earlier.id, "gfs_20240101_18_f006");
    assert_eq!(bracket.later.id, "gfs_20240101_18_f009");
}

#[tokio::test]
async fn test_times_outside_catalog_clamp_to_ends() {
    let engine = engine_with(WindFieldConfig::default());

    let before = assert_ok!(engine.bracket_datasets(at_hour(-12.0)).await);
    assert!(before.is_degenerate());
    assert_eq!(before.earlier.id, "gfs_20240101_00_f000");

    let after = assert_ok!(engine.bracket_datasets(at_hour(48.0)).await);
    assert!(after.is_degenerate());
    assert_eq!(after.later.id, "gfs_20240101_18_f003");
    assert_eq!(after.percent(at_hour(48.0)), 0.0);
}

#[tokio::test]
async fn test_no_usable_hours_is_configuration_error() {
    let config = WindFieldConfig {
        usable_forecast_hours: vec![24],
        ..Default::default()
    };
    let engine = engine_with(config);

    let err = assert_err!(engine.bracket_datasets(at_hour(3.0)).await);
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

/// Catalog that only publishes the later dataset after the first lookup.
#[derive(Default)]
struct PublishingCatalog {
    lookups: AtomicUsize,
}

#[async_trait]
impl DatasetCatalog for PublishingCatalog {
    async fn resolve(&self, _timestamp_ms: i64) -> wind_field::Result<Vec<CatalogEntry>> {
        let mut entries = vec![entry_at(small_grid::EARLY_DATASET, small_grid::EARLY_TIME_MS)];
        if self.lookups.fetch_add(1, Ordering::Relaxed) > 0 {
            entries.push(entry_at(small_grid::LATE_DATASET, small_grid::LATE_TIME_MS));
        }
        Ok(entries)
    }
}

#[tokio::test]
async fn test_newly_published_dataset_is_picked_up() {
    let engine = assert_ok!(WindFieldEngine::with_axes(
        WindFieldConfig::default(),
        scenario_decoder(),
        PublishingCatalog::default(),
        scenario_axes(),
    ));

    let before = assert_ok!(engine.bracket_datasets(50).await);
    assert!(before.is_degenerate());
    assert_eq!(before.later.id, small_grid::EARLY_DATASET);

    let after = assert_ok!(engine.bracket_datasets(50).await);
    assert_eq!(after.earlier.id, small_grid::EARLY_DATASET);
    assert_eq!(after.later.id, small_grid::LATE_DATASET);

    // Unchanged catalog keeps giving the same bracket
    assert_eq!(assert_ok!(engine.bracket_datasets(50).await), after);
}
