//! Unit conversions shared by the control surface and the export serializer.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Time Conversions
//!
//! - [`seconds_to_ms`] / [`ms_to_seconds`]

use libm::{log10, pow};

/// Smallest linear gain converted to decibels; silence maps to -200 dB
/// instead of negative infinity so the value stays representable in JSON.
pub const MIN_LINEAR_GAIN: f64 = 1e-10;

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use stemfx_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 1e-12);
/// assert!((db_to_linear(-6.0206) - 0.5).abs() < 1e-4);
/// ```
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    pow(10.0, db / 20.0)
}

/// Convert linear gain to decibels: `20·log10(linear)`.
///
/// Inputs at or below [`MIN_LINEAR_GAIN`] are floored to it.
///
/// # Example
/// ```rust
/// use stemfx_core::linear_to_db;
///
/// assert_eq!(linear_to_db(1.0), 0.0);
/// assert!((linear_to_db(2.0) - 6.0206).abs() < 1e-4);
/// ```
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    20.0 * log10(linear.max(MIN_LINEAR_GAIN))
}

/// Convert seconds to milliseconds.
#[inline]
pub fn seconds_to_ms(seconds: f64) -> f64 {
    seconds * 1000.0
}

/// Convert milliseconds to seconds.
#[inline]
pub fn ms_to_seconds(ms: f64) -> f64 {
    ms / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_linear_roundtrip() {
        let original = 0.5;
        let back = db_to_linear(linear_to_db(original));
        assert!((original - back).abs() < 1e-12);
    }

    #[test]
    fn test_db_known_values() {
        assert_eq!(linear_to_db(1.0), 0.0);
        assert!((linear_to_db(2.0) - 6.020599913279624).abs() < 1e-12);
        assert!((linear_to_db(0.5) + 6.020599913279624).abs() < 1e-12);
        assert!((linear_to_db(10.0) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_silence_is_floored() {
        assert!((linear_to_db(0.0) + 200.0).abs() < 1e-9);
        assert!((linear_to_db(-1.0) + 200.0).abs() < 1e-9);
        assert!(linear_to_db(0.0).is_finite());
    }

    #[test]
    fn test_time_conversion() {
        assert_eq!(seconds_to_ms(0.25), 250.0);
        assert_eq!(seconds_to_ms(0.003), 3.0);
        assert_eq!(ms_to_seconds(250.0), 0.25);
    }
}
