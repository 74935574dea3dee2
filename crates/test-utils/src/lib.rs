//! Shared test utilities for the wind-field workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic axis and wind-field generators
//! - The inverse barometric formula, to aim queries at exact pressure levels
//! - Common test fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, fixtures, linear_wind};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f64, 1.0_f64, 0.001_f64);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of (eastward, northward) wind pairs.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_wind_approx_eq;
///
/// assert_wind_approx_eq!((wind.eastward, wind.northward), (3.0, -1.5), 1e-9);
/// ```
#[macro_export]
macro_rules! assert_wind_approx_eq {
    (($u1:expr, $v1:expr), ($u2:expr, $v2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($u1, $u2, $epsilon);
        $crate::assert_approx_eq!($v1, $v2, $epsilon);
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_rejects_nan() {
        assert_approx_eq!(f64::NAN, 1.0, 0.001);
    }

    #[test]
    fn test_assert_wind_approx_eq_passes() {
        assert_wind_approx_eq!((1.0001, 2.0001), (1.0, 2.0), 0.001);
    }
}
