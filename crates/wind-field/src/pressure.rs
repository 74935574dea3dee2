//! Altitude to pressure-level conversion.

/// Altitude (m) where the barometric formula switches regime.
pub const TROPOPAUSE_ALTITUDE_M: f64 = 11_000.0;

/// Convert geometric altitude in meters to pressure in hPa.
///
/// Uses the troposphere formula below 11 km and the isothermal stratosphere
/// formula above. Total over finite inputs and strictly decreasing.
pub fn altitude_to_pressure(altitude_m: f64) -> f64 {
    if altitude_m < TROPOPAUSE_ALTITUDE_M {
        101_325.0 * ((1.0 - altitude_m / 44_330.7).ln() / 0.190_266).exp() / 100.0
    } else {
        22_632.1 * (altitude_m / -6_341.73).exp() / 0.176_481 / 100.0
    }
}
