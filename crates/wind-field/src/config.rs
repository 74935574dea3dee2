//! Configuration for the wind-field engine.

use serde::{Deserialize, Serialize};

use crate::cache::PreloadPolicy;

/// Configuration for the wind-field engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindFieldConfig {
    /// Half-width, in degrees, of the box decoded on a cache miss.
    pub preload_range_deg: f64,

    /// Field holding the eastward wind component.
    pub eastward_field: String,

    /// Field holding the northward wind component.
    pub northward_field: String,

    /// Forecast hours used to build the time axis.
    pub usable_forecast_hours: Vec<u32>,

    /// Drop pressure levels below this altitude when building the level axis.
    pub min_altitude_m: Option<f64>,
}

impl Default for WindFieldConfig {
    fn default() -> Self {
        Self {
            preload_range_deg: 20.0,
            eastward_field: "u".to_string(),
            northward_field: "v".to_string(),
            usable_forecast_hours: vec![0, 3],
            min_altitude_m: None,
        }
    }
}

impl WindFieldConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("WIND_PRELOAD_RANGE_DEG") {
            if let Ok(range) = val.parse() {
                config.preload_range_deg = range;
            }
        }

        if let Ok(val) = std::env::var("WIND_EASTWARD_FIELD") {
            config.eastward_field = val;
        }

        if let Ok(val) = std::env::var("WIND_NORTHWARD_FIELD") {
            config.northward_field = val;
        }

        if let Ok(val) = std::env::var("WIND_USABLE_FORECAST_HOURS") {
            if let Some(hours) = parse_hours(&val) {
                config.usable_forecast_hours = hours;
            }
        }

        if let Ok(val) = std::env::var("WIND_MIN_ALTITUDE_M") {
            if let Ok(altitude) = val.parse() {
                config.min_altitude_m = Some(altitude);
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.preload_range_deg.is_finite() || self.preload_range_deg <= 0.0 {
            return Err("preload_range_deg must be a positive number".to_string());
        }

        if self.eastward_field.is_empty() || self.northward_field.is_empty() {
            return Err("wind component field names must not be empty".to_string());
        }

        if self.eastward_field == self.northward_field {
            return Err("eastward_field and northward_field must differ".to_string());
        }

        if self.usable_forecast_hours.is_empty() {
            return Err("usable_forecast_hours must not be empty".to_string());
        }

        if let Some(altitude) = self.min_altitude_m {
            if !altitude.is_finite() {
                return Err("min_altitude_m must be finite".to_string());
            }
        }

        Ok(())
    }

    /// Cache-miss policy: fetch both wind components together.
    pub fn preload_policy(&self) -> PreloadPolicy {
        PreloadPolicy::new(
            self.preload_range_deg,
            vec![self.eastward_field.clone(), self.northward_field.clone()],
        )
    }
}

/// Parse a comma-separated hour list such as "0,3".
fn parse_hours(s: &str) -> Option<Vec<u32>> {
    let hours: Result<Vec<u32>, _> = s
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::parse)
        .collect();
    hours.ok().filter(|h| !h.is_empty())
}
