//! Common test fixtures for wind-field tests.
//!
//! This module provides pre-defined grids and times that represent common
//! scenarios in wind queries.

/// The 3×3×2 synthetic grid used by the end-to-end scenarios.
pub mod small_grid {
    /// Latitude axis (degrees)
    pub const LATITUDES: [f64; 3] = [-1.0, 0.0, 1.0];

    /// Longitude axis in grid convention (degrees, query longitude + 180)
    pub const LONGITUDES: [f64; 3] = [0.0, 1.0, 2.0];

    /// Pressure levels (hPa)
    pub const LEVELS: [f64; 2] = [1000.0, 900.0];

    /// Query longitude that lands on grid longitude 1.0
    pub const CENTRE_QUERY_LONGITUDE: f64 = -179.0;

    /// Valid times (ms) of the two synthetic datasets
    pub const EARLY_TIME_MS: i64 = 0;
    pub const LATE_TIME_MS: i64 = 100;

    /// Dataset identifiers
    pub const EARLY_DATASET: &str = "synthetic_000";
    pub const LATE_DATASET: &str = "synthetic_100";
}

/// A GFS-like 0.5° grid patch over California.
pub mod gfs_patch {
    /// First latitude of the patch
    pub const LAT_START: f64 = 30.0;

    /// First grid longitude of the patch (-130° + 180)
    pub const LON_START: f64 = 50.0;

    /// Grid spacing in degrees
    pub const STEP: f64 = 0.5;

    /// Points per side
    pub const POINTS: usize = 41;

    /// Isobaric levels carried by the patch (hPa)
    pub const LEVELS: [f64; 6] = [100.0, 150.0, 200.0, 250.0, 300.0, 500.0];
}

/// Common time values for testing.
pub mod time {
    /// Milliseconds per hour
    pub const HOUR_MS: i64 = 60 * 60 * 1000;

    /// GFS model run hours
    pub const GFS_CYCLES: [u32; 4] = [0, 6, 12, 18];

    /// Forecast hours published per GFS cycle in the test catalogs
    pub const FORECAST_HOURS: [u32; 4] = [0, 3, 6, 9];
}
