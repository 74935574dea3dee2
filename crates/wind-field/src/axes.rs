//! Grid axis index: bracket lookups on the latitude, longitude and level axes.

use tracing::info;

use crate::decoder::ScalarGridDecoder;
use crate::error::{Result, WindFieldError};
use crate::pressure::altitude_to_pressure;
use crate::types::Bracket;

/// Shift applied to query longitudes to land on the grid's [0, 360) axis.
pub const LONGITUDE_OFFSET: f64 = 180.0;

/// Find the two axis values surrounding `value`.
///
/// Locates the first element strictly greater than `value`; the lower bound
/// is the element before it and the upper bound the element itself, each
/// clamped to the axis. Queries at or beyond either edge give a degenerate
/// bracket.
///
/// # Panics
/// Panics if `axis` is empty. [`GridAxes`] never holds an empty axis.
pub fn bracket(axis: &[f64], value: f64) -> Bracket {
    let idx = axis.partition_point(|&x| x <= value);
    let lower = axis[idx.saturating_sub(1)];
    let upper = axis[idx.min(axis.len() - 1)];
    Bracket::new(lower, upper)
}

/// Fractional position of `value` between `lower` and `upper`, inverted.
///
/// Returns 1.0 when `value` sits on `lower` and 0.0 when it sits on `upper`.
/// A degenerate pair returns 0.0 so all weight goes to `upper`, which is the
/// same axis value.
pub fn percent(value: f64, lower: f64, upper: f64) -> f64 {
    if lower == upper {
        return 0.0;
    }
    1.0 - ((value - lower) / (upper - lower)).clamp(0.0, 1.0)
}

/// The three coordinate axes of the forecast grid.
///
/// Built once, then shared read-only by every dataset. Each axis is
/// non-empty, ascending and free of duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxes {
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    levels: Vec<f64>,
}

impl GridAxes {
    /// Build axes from raw coordinate lists, sorting and de-duplicating each.
    pub fn new(latitudes: Vec<f64>, longitudes: Vec<f64>, levels: Vec<f64>) -> Result<Self> {
        Ok(Self {
            latitudes: normalize_axis("latitude", latitudes)?,
            longitudes: normalize_axis("longitude", longitudes)?,
            levels: normalize_axis("level", levels)?,
        })
    }

    /// Build axes from a reference dataset.
    ///
    /// Levels are the isobaric levels carrying `field`. With a minimum
    /// altitude, levels below it (higher pressure) are dropped. Latitudes and
    /// longitudes are read from `field` at one of the remaining levels.
    pub async fn from_reference<D>(
        decoder: &D,
        handle: &D::Handle,
        field: &str,
        min_altitude_m: Option<f64>,
    ) -> Result<Self>
    where
        D: ScalarGridDecoder + ?Sized,
    {
        let mut levels = decoder.levels(handle, field).await?;
        if let Some(min_altitude) = min_altitude_m {
            let ceiling = altitude_to_pressure(min_altitude);
            levels.retain(|&level| level <= ceiling);
        }

        let reference_level = *levels.first().ok_or_else(|| {
            WindFieldError::configuration(format!(
                "reference dataset has no usable levels for field '{field}'"
            ))
        })?;

        let (latitudes, longitudes) = decoder.coordinates(handle, field, reference_level).await?;
        let axes = Self::new(latitudes, longitudes, levels)?;

        info!(
            field,
            latitudes = axes.latitudes.len(),
            longitudes = axes.longitudes.len(),
            levels = axes.levels.len(),
            "Built grid axes from reference dataset"
        );

        Ok(axes)
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    /// Pressure levels in hPa, ascending (so descending in altitude).
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn bracket_latitude(&self, latitude: f64) -> Bracket {
        bracket(&self.latitudes, latitude)
    }

    /// Bracket a query longitude in [-180, 180) on the shifted grid axis.
    pub fn bracket_longitude(&self, longitude: f64) -> Bracket {
        bracket(&self.longitudes, longitude + LONGITUDE_OFFSET)
    }

    pub fn bracket_level(&self, pressure_hpa: f64) -> Bracket {
        bracket(&self.levels, pressure_hpa)
    }
}

fn normalize_axis(name: &str, mut values: Vec<f64>) -> Result<Vec<f64>> {
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(WindFieldError::configuration(format!(
            "{name} axis contains non-finite value {bad}"
        )));
    }
    values.sort_by(f64::total_cmp);
    values.dedup();
    if values.is_empty() {
        return Err(WindFieldError::configuration(format!("{name} axis is empty")));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AXIS: [f64; 5] = [-2.0, -1.0, 0.0, 0.5, 3.0];

    #[test]
    fn test_bracket_inside() {
        for value in [-1.5, -0.25, 0.1, 0.75, 2.9] {
            let b = bracket(&AXIS, value);
            assert!(b.lower <= value && value <= b.upper, "{value}: {b:?}");
            assert!(AXIS.contains(&b.lower));
            assert!(AXIS.contains(&b.upper));
        }
        assert_eq!(bracket(&AXIS, 0.75), Bracket::new(0.5, 3.0));
    }

    #[test]
    fn test_bracket_exact_value_is_lower() {
        assert_eq!(bracket(&AXIS, -1.0), Bracket::new(-1.0, 0.0));
        assert_eq!(bracket(&AXIS, -2.0), Bracket::new(-2.0, -1.0));
        // The last value has no successor
        assert_eq!(bracket(&AXIS, 3.0), Bracket::new(3.0, 3.0));
    }

    #[test]
    fn test_bracket_clamps_outside() {
        let below = bracket(&AXIS, -40.0);
        assert_eq!(below, Bracket::new(-2.0, -2.0));
        assert!(below.is_degenerate());

        let above = bracket(&AXIS, 40.0);
        assert_eq!(above, Bracket::new(3.0, 3.0));
    }

    #[test]
    fn test_bracket_single_value_axis() {
        assert_eq!(bracket(&[850.0], 100.0), Bracket::new(850.0, 850.0));
        assert_eq!(bracket(&[850.0], 900.0), Bracket::new(850.0, 850.0));
    }

    #[test]
    fn test_percent_convention() {
        assert_eq!(percent(10.0, 10.0, 20.0), 1.0);
        assert_eq!(percent(20.0, 10.0, 20.0), 0.0);
        assert!((percent(12.5, 10.0, 20.0) - 0.75).abs() < 1e-12);
        // Clamped outside the pair
        assert_eq!(percent(5.0, 10.0, 20.0), 1.0);
        assert_eq!(percent(25.0, 10.0, 20.0), 0.0);
    }

    #[test]
    fn test_percent_degenerate() {
        assert_eq!(percent(10.0, 10.0, 10.0), 0.0);
        assert_eq!(percent(-999.0, 10.0, 10.0), 0.0);
    }

    #[test]
    fn test_axes_sorted_and_deduplicated() {
        let axes = GridAxes::new(
            vec![1.0, -1.0, 0.0, 0.0],
            vec![2.0, 0.0, 1.0],
            vec![1000.0, 900.0, 1000.0],
        )
        .unwrap();
        assert_eq!(axes.latitudes(), &[-1.0, 0.0, 1.0]);
        assert_eq!(axes.longitudes(), &[0.0, 1.0, 2.0]);
        assert_eq!(axes.levels(), &[900.0, 1000.0]);
    }

    #[test]
    fn test_axes_reject_empty_and_nan() {
        let err = GridAxes::new(vec![], vec![0.0], vec![500.0]).unwrap_err();
        assert!(err.to_string().contains("latitude axis is empty"));

        let err = GridAxes::new(vec![0.0], vec![f64::NAN], vec![500.0]).unwrap_err();
        assert!(err.to_string().contains("longitude"));
    }

    #[test]
    fn test_longitude_shift() {
        let axes = GridAxes::new(vec![0.0], vec![0.0, 0.5, 1.0, 359.5], vec![500.0]).unwrap();
        // -179.75 -> 0.25 on the grid axis
        assert_eq!(axes.bracket_longitude(-179.75), Bracket::new(0.0, 0.5));
        assert_eq!(axes.bracket_longitude(179.75), Bracket::new(359.5, 359.5));
    }
}
