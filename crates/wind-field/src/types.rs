//! Core value types shared by the wind-field components.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// A latitude/longitude box in grid coordinates.
///
/// Longitudes use the grid convention ([0, 360) after the +180 shift), and
/// no wrapping is applied at the seam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Square box of the given half-width centred on a point.
    pub fn around(latitude: f64, longitude: f64, half_width: f64) -> Self {
        Self::new(
            longitude - half_width,
            latitude - half_width,
            longitude + half_width,
            latitude + half_width,
        )
    }

    /// Check if a point is contained within this bounding box (edges inclusive).
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

/// One decoded scalar value at an exact grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSample {
    pub value: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl GridSample {
    pub fn new(value: f64, latitude: f64, longitude: f64) -> Self {
        Self {
            value,
            latitude,
            longitude,
        }
    }
}

/// An exact grid coordinate: latitude, grid longitude and pressure level (hPa).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub level: f64,
}

impl GridPoint {
    pub fn new(latitude: f64, longitude: f64, level: f64) -> Self {
        Self {
            latitude,
            longitude,
            level,
        }
    }
}

/// The two axis values surrounding a query coordinate.
///
/// `lower == upper` when the query sits on or beyond an edge of the axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub lower: f64,
    pub upper: f64,
}

impl Bracket {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// True when both bounds are the same axis value.
    pub fn is_degenerate(&self) -> bool {
        self.lower == self.upper
    }

    /// Weight of the lower bound for `value`; see [`crate::axes::percent`].
    pub fn percent(&self, value: f64) -> f64 {
        crate::axes::percent(value, self.lower, self.upper)
    }

    /// Both bounds, lower first.
    pub fn bounds(&self) -> [f64; 2] {
        [self.lower, self.upper]
    }
}

/// Horizontal wind in the grid's native units (m/s for GFS).
///
/// `eastward` is positive toward the east and `northward` positive toward
/// the north.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindVector {
    pub eastward: f64,
    pub northward: f64,
}

impl WindVector {
    pub fn new(eastward: f64, northward: f64) -> Self {
        Self {
            eastward,
            northward,
        }
    }

    /// Magnitude of the vector.
    pub fn speed(&self) -> f64 {
        self.eastward.hypot(self.northward)
    }

    /// Direction the air moves toward, in degrees clockwise from true north,
    /// normalised to [0, 360).
    pub fn bearing_deg(&self) -> f64 {
        let bearing = self.eastward.atan2(self.northward).to_degrees();
        if bearing < 0.0 {
            bearing + 360.0
        } else {
            bearing
        }
    }

    /// Weighted blend where `weight` applies to `lower` and `1 - weight` to `upper`.
    pub fn blend(lower: WindVector, upper: WindVector, weight: f64) -> WindVector {
        lower * weight + upper * (1.0 - weight)
    }
}

impl Add for WindVector {
    type Output = WindVector;

    fn add(self, rhs: WindVector) -> WindVector {
        WindVector::new(self.eastward + rhs.eastward, self.northward + rhs.northward)
    }
}

impl Mul<f64> for WindVector {
    type Output = WindVector;

    fn mul(self, rhs: f64) -> WindVector {
        WindVector::new(self.eastward * rhs, self.northward * rhs)
    }
}

/// Statistics about the sample cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Number of neighbourhood fills triggered by misses.
    pub fills: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Calculate the cache hit rate (0.0 - 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Sum of two stats, used to aggregate over datasets.
    pub fn merge(&self, other: &CacheStats) -> CacheStats {
        CacheStats {
            hits: self.hits + other.hits,
            misses: self.misses + other.misses,
            fills: self.fills + other.fills,
            entries: self.entries + other.entries,
        }
    }
}
