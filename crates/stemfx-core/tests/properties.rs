//! Property-based tests for stemfx-core unit math and parameter descriptors.

use proptest::prelude::*;
use stemfx_core::{DelayTime, ParamDescriptor, db_to_linear, linear_to_db};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// dB conversion inverts linear conversion across the audible gain range.
    #[test]
    fn db_linear_inverse(linear in 1e-6f64..100.0f64) {
        let back = db_to_linear(linear_to_db(linear));
        prop_assert!((back - linear).abs() <= linear * 1e-9,
            "linear {} came back as {}", linear, back);
    }

    /// linear_to_db never yields a non-finite number.
    #[test]
    fn linear_to_db_is_finite(linear in -10.0f64..10.0f64) {
        prop_assert!(linear_to_db(linear).is_finite());
    }

    /// Clamping always lands inside the range and is idempotent.
    #[test]
    fn clamp_stays_in_range(value in -1e6f64..1e6f64) {
        let desc = ParamDescriptor::frequency("frequency", 0.0, 20000.0, 20000.0);
        let clamped = desc.clamp(value);
        prop_assert!(desc.contains(clamped));
        prop_assert_eq!(desc.clamp(clamped), clamped);
    }

    /// Faster tempo always gives a shorter note-valued delay.
    #[test]
    fn note_delay_scales_inversely_with_bpm(bpm in 20.0f64..300.0f64) {
        let time = DelayTime::default();
        prop_assert!(time.to_seconds(bpm * 2.0) < time.to_seconds(bpm));
        prop_assert!((time.to_seconds(bpm) - 30.0 / bpm).abs() < 1e-12);
    }
}
