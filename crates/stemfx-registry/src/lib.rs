//! Node registry for the stemfx effect chain.
//!
//! The registry holds exactly one [`Stage`] per [`StageId`], created once
//! with neutral defaults and never swapped. Stages are addressed by slot
//! rather than by string key, and iteration always walks every slot in
//! signal order.
//!
//! The registry owns the parameter state the engine exports from. Writing
//! the same values to the runtime nodes is the engine's job.
//!
//! # Example
//!
//! ```rust
//! use stemfx_core::StageId;
//! use stemfx_registry::NodeRegistry;
//!
//! let mut registry = NodeRegistry::new();
//! assert_eq!(registry.value(StageId::Lowpass, "frequency"), 20000.0);
//!
//! registry.set(StageId::Lowpass, "frequency", 5000.0).unwrap();
//! assert_eq!(registry.stage(StageId::Lowpass).param("frequency"), Some(5000.0));
//!
//! // Unknown parameter names are rejected
//! assert!(registry.set(StageId::Lowpass, "drive", 1.0).is_err());
//! ```

mod descriptors;

pub use descriptors::{STAGES, StageDescriptor, descriptor};

use stemfx_core::{ParamDescriptor, StageCategory, StageId, StageKind};

/// Errors from registry parameter access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The stage has no parameter with this name.
    #[error("stage '{stage}' has no parameter '{name}'")]
    UnknownParameter {
        /// Slot that was addressed.
        stage: StageId,
        /// Parameter name that was not found.
        name: String,
    },
}

/// One processing stage instance: a slot and its current parameter values.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    descriptor: &'static StageDescriptor,
    values: Vec<f64>,
}

impl Stage {
    /// Creates a stage with every parameter at its neutral default.
    pub fn new(id: StageId) -> Self {
        let descriptor = descriptor(id);
        Self {
            descriptor,
            values: descriptor.params.iter().map(|p| p.default).collect(),
        }
    }

    /// Slot this stage occupies.
    pub fn id(&self) -> StageId {
        self.descriptor.id
    }

    /// Processing kind.
    pub fn kind(&self) -> StageKind {
        self.descriptor.kind()
    }

    /// Static descriptor for this stage.
    pub fn descriptor(&self) -> &'static StageDescriptor {
        self.descriptor
    }

    /// Current value of a parameter, or `None` for an unknown name.
    pub fn param(&self, name: &str) -> Option<f64> {
        self.descriptor
            .param_index(name)
            .and_then(|i| self.values.get(i).copied())
    }

    /// Current value of a parameter this stage is known to have.
    ///
    /// Unknown names read as `0.0`; use [`param`](Self::param) when the name
    /// comes from outside.
    pub fn value(&self, name: &str) -> f64 {
        self.param(name).unwrap_or(0.0)
    }

    /// Sets a parameter, returning the previous value.
    ///
    /// No range check is applied here; range policy belongs to the caller.
    pub fn set(&mut self, name: &str, value: f64) -> Result<f64, RegistryError> {
        let index = self
            .descriptor
            .param_index(name)
            .ok_or_else(|| RegistryError::UnknownParameter {
                stage: self.id(),
                name: name.to_string(),
            })?;
        let previous = core::mem::replace(&mut self.values[index], value);
        Ok(previous)
    }

    /// Iterates `(descriptor, value)` pairs in table order.
    pub fn params(&self) -> impl Iterator<Item = (&'static ParamDescriptor, f64)> + '_ {
        self.descriptor
            .params
            .iter()
            .zip(self.values.iter().copied())
    }

    /// Returns `true` if every parameter sits at its neutral default.
    pub fn is_neutral(&self) -> bool {
        self.params().all(|(desc, value)| desc.is_default(value))
    }

    /// Restores every parameter to its neutral default.
    pub fn reset(&mut self) {
        for (value, desc) in self.values.iter_mut().zip(self.descriptor.params) {
            *value = desc.default;
        }
    }
}

/// Registry of every stage in the graph.
///
/// Holds one [`Stage`] for each [`StageId`], stored in signal order.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRegistry {
    stages: Vec<Stage>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    /// Create a registry with every stage at its neutral defaults.
    pub fn new() -> Self {
        let stages: Vec<Stage> = StageId::SIGNAL_ORDER.into_iter().map(Stage::new).collect();
        tracing::debug!(stages = stages.len(), "node registry created");
        Self { stages }
    }

    /// Returns the stage in a slot.
    pub fn stage(&self, id: StageId) -> &Stage {
        &self.stages[id.signal_index()]
    }

    /// Returns the stage in a slot, mutably.
    pub fn stage_mut(&mut self, id: StageId) -> &mut Stage {
        &mut self.stages[id.signal_index()]
    }

    /// Reads a parameter by name.
    pub fn get(&self, id: StageId, name: &str) -> Result<f64, RegistryError> {
        self.stage(id)
            .param(name)
            .ok_or_else(|| RegistryError::UnknownParameter {
                stage: id,
                name: name.to_string(),
            })
    }

    /// Reads a parameter the slot is known to have. See [`Stage::value`].
    pub fn value(&self, id: StageId, name: &str) -> f64 {
        self.stage(id).value(name)
    }

    /// Writes a parameter by name, returning the previous value.
    pub fn set(&mut self, id: StageId, name: &str, value: f64) -> Result<f64, RegistryError> {
        self.stage_mut(id).set(name, value)
    }

    /// Looks up a parameter descriptor.
    pub fn param_descriptor(
        &self,
        id: StageId,
        name: &str,
    ) -> Result<&'static ParamDescriptor, RegistryError> {
        descriptor(id)
            .param(name)
            .ok_or_else(|| RegistryError::UnknownParameter {
                stage: id,
                name: name.to_string(),
            })
    }

    /// Iterates every stage in signal order.
    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }

    /// Returns the stages in a category, in signal order.
    pub fn stages_in_category(&self, category: StageCategory) -> Vec<&Stage> {
        self.stages
            .iter()
            .filter(|s| s.descriptor().category() == category)
            .collect()
    }

    /// Restores every stage to its neutral defaults.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }

    /// Returns the number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the registry holds no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
