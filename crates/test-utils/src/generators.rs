//! Generators for synthetic grids and wind fields.
//!
//! The wind fields are linear in latitude, longitude and pressure, so
//! quadrilinear interpolation reproduces them exactly anywhere inside the
//! grid. That makes every interior query verifiable against a closed form.

/// Creates an ascending axis of `count` values starting at `start`.
///
/// # Example
///
/// ```
/// use test_utils::regular_axis;
///
/// assert_eq!(regular_axis(-1.0, 0.5, 5), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
/// ```
pub fn regular_axis(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

/// Linear wind field: returns (eastward, northward) in m/s.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees
/// * `lon` - Grid longitude in degrees ([0, 360) convention)
/// * `level` - Pressure level in hPa
pub fn linear_wind(lat: f64, lon: f64, level: f64) -> (f64, f64) {
    let u = 10.0 + 2.0 * lat + 0.5 * lon - 0.01 * level;
    let v = -3.0 + lat - 0.25 * lon + 0.02 * level;
    (u, v)
}

/// A second linear field, different from [`linear_wind`] at every point,
/// for the later of two datasets.
pub fn shear_wind(lat: f64, lon: f64, level: f64) -> (f64, f64) {
    let u = -4.0 + 0.5 * lat + lon + 0.03 * level;
    let v = 6.0 - lat + 0.5 * lon - 0.01 * level;
    (u, v)
}

/// Eastward component of [`linear_wind`].
pub fn linear_u(lat: f64, lon: f64, level: f64) -> f64 {
    linear_wind(lat, lon, level).0
}

/// Northward component of [`linear_wind`].
pub fn linear_v(lat: f64, lon: f64, level: f64) -> f64 {
    linear_wind(lat, lon, level).1
}

/// Eastward component of [`shear_wind`].
pub fn shear_u(lat: f64, lon: f64, level: f64) -> f64 {
    shear_wind(lat, lon, level).0
}

/// Northward component of [`shear_wind`].
pub fn shear_v(lat: f64, lon: f64, level: f64) -> f64 {
    shear_wind(lat, lon, level).1
}

/// Altitude in meters at which the barometric formula gives `pressure_hpa`.
///
/// Inverse of the two-regime altitude-to-pressure transform, used to aim
/// queries at an exact pressure level.
pub fn altitude_for_pressure(pressure_hpa: f64) -> f64 {
    // Pressure at 11 km, where the formula changes regime
    const TROPOPAUSE_HPA: f64 = 226.3209;

    if pressure_hpa > TROPOPAUSE_HPA {
        44_330.7 * (1.0 - (pressure_hpa / 1013.25).powf(0.190_266))
    } else {
        -6_341.73 * (pressure_hpa * 100.0 * 0.176_481 / 22_632.1).ln()
    }
}
