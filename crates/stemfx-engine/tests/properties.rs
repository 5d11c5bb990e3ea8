//! Property-based tests for activity inference and export.
//!
//! Export must be pure and its order fixed no matter how parameters were set.

use proptest::prelude::*;
use stemfx_core::StageId;
use stemfx_engine::{AudioEngine, EXPORT_ORDER, EngineOptions, HeadlessRuntime, renderer_type};
use stemfx_registry::{NodeRegistry, Stage};

/// A (slot, parameter index, position in range) triple.
fn param_write() -> impl Strategy<Value = (usize, usize, f64)> {
    (0usize..StageId::COUNT, 0usize..4, 0.0f64..=1.0f64)
}

/// Slot and parameter name a write addresses.
fn target((slot, index, _): (usize, usize, f64)) -> (StageId, &'static str) {
    let id = StageId::SIGNAL_ORDER[slot];
    let params = Stage::new(id).descriptor().params;
    (id, params[index % params.len()].name)
}

fn apply(engine: &mut AudioEngine<HeadlessRuntime>, write: (usize, usize, f64)) {
    let (id, name) = target(write);
    let desc = engine.registry().param_descriptor(id, name).unwrap();
    let value = desc.min + (desc.max - desc.min) * write.2;
    engine.set_param(id, name, value).unwrap();
}

fn engine() -> AudioEngine<HeadlessRuntime> {
    AudioEngine::new(HeadlessRuntime::new(), EngineOptions::default()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Exporting twice without changes yields identical descriptors.
    #[test]
    fn export_is_idempotent(writes in prop::collection::vec(param_write(), 0..40)) {
        let mut engine = engine();
        for w in writes {
            apply(&mut engine, w);
        }
        let first = engine.export();
        let second = engine.export();
        prop_assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
        prop_assert_eq!(first, second);
    }

    /// Entry order follows the fixed export order.
    #[test]
    fn export_order_is_fixed(writes in prop::collection::vec(param_write(), 0..40)) {
        let mut engine = engine();
        for w in writes {
            apply(&mut engine, w);
        }
        let descriptor = engine.export();
        let mut positions = Vec::new();
        for entry in &descriptor {
            // Gain appears at both ends; search from the last matched position.
            let start = positions.last().map_or(0, |p| p + 1);
            let pos = EXPORT_ORDER[start..]
                .iter()
                .position(|id| renderer_type(*id) == entry.effect_type)
                .map(|p| p + start);
            prop_assert!(pos.is_some(), "{} out of order", entry.effect_type);
            positions.extend(pos);
        }
    }

    /// The same final state exported after writes in any order gives the same descriptor.
    #[test]
    fn export_ignores_write_order(
        writes in prop::collection::vec(param_write(), 1..20),
        seed in any::<u64>(),
    ) {
        // Each parameter is written once, so only the order of writes differs.
        let mut unique: Vec<(usize, usize, f64)> = Vec::new();
        for w in writes {
            if !unique.iter().any(|u| target(*u) == target(w)) {
                unique.push(w);
            }
        }
        let mut shuffled = unique.clone();
        let len = shuffled.len();
        let mut state = seed;
        for i in (1..len).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            shuffled.swap(i, j);
        }

        let mut a = engine();
        let mut b = engine();
        for w in &unique {
            apply(&mut a, *w);
        }
        for w in &shuffled {
            apply(&mut b, *w);
        }
        prop_assert_eq!(a.export(), b.export());
    }

    /// Any frequency other than a filter's neutral default activates it.
    #[test]
    fn filter_activity_matches_default(freq in 0.0f64..=20000.0f64) {
        for id in [
            StageId::Lowpass, StageId::Highpass, StageId::Bandpass, StageId::Notch,
            StageId::Peaking, StageId::LowShelf, StageId::HighShelf,
        ] {
            let mut registry = NodeRegistry::new();
            registry.set(id, "frequency", freq).unwrap();
            let default = registry.param_descriptor(id, "frequency").unwrap().default;
            prop_assert_eq!(stemfx_engine::is_active(registry.stage(id)), freq != default);
        }
    }

    /// Every exported number is finite.
    #[test]
    fn exported_values_are_finite(writes in prop::collection::vec(param_write(), 0..40)) {
        let mut engine = engine();
        for w in writes {
            apply(&mut engine, w);
        }
        for entry in &engine.export() {
            for (name, value) in &entry.params {
                prop_assert!(value.is_finite(), "{}.{} = {}", entry.effect_type, name, value);
            }
        }
    }
}
