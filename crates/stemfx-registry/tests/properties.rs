//! Property-based tests for the node registry.

use proptest::prelude::*;
use stemfx_core::StageId;
use stemfx_registry::NodeRegistry;

fn slot() -> impl Strategy<Value = StageId> {
    (0usize..StageId::COUNT).prop_map(|i| StageId::SIGNAL_ORDER[i])
}

proptest! {
    /// A write is read back exactly and reported the previous value.
    #[test]
    fn set_then_get(id in slot(), index in 0usize..4, value in -1.0e6f64..1.0e6f64) {
        let mut registry = NodeRegistry::new();
        let params = registry.stage(id).descriptor().params;
        let name = params[index % params.len()].name;
        let before = registry.value(id, name);

        let previous = registry.set(id, name, value).unwrap();
        prop_assert_eq!(previous, before);
        prop_assert_eq!(registry.get(id, name).unwrap(), value);
    }

    /// Writes to one slot never touch another.
    #[test]
    fn writes_are_isolated(id in slot(), value in 0.0f64..1.0f64) {
        let mut registry = NodeRegistry::new();
        let name = registry.stage(id).descriptor().params[0].name;
        registry.set(id, name, value).unwrap();
        for stage in registry.iter().filter(|s| s.id() != id) {
            prop_assert!(stage.is_neutral(), "{} changed", stage.id());
        }
    }

    /// Reset restores every stage to neutral after arbitrary writes.
    #[test]
    fn reset_restores_neutral(writes in prop::collection::vec((slot(), -100.0f64..100.0f64), 0..30)) {
        let mut registry = NodeRegistry::new();
        for (id, value) in writes {
            let name = registry.stage(id).descriptor().params[0].name;
            registry.set(id, name, value).unwrap();
        }
        registry.reset();
        prop_assert!(registry.iter().all(|s| s.is_neutral()));
    }
}
