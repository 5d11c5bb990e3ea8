//! Descriptor validation against the renderer schema.
//!
//! A descriptor is valid when every entry names an effect type the renderer
//! knows, every parameter is one that type accepts, every value is finite,
//! and any region is a non-empty, non-negative time span.
//!
//! # Example
//!
//! ```rust
//! use stemfx_config::validate_descriptor;
//! use stemfx_engine::{EffectChainDescriptor, EffectEntry};
//!
//! let good = EffectChainDescriptor::new(vec![
//!     EffectEntry::new("LowpassFilter").with_param("cutoff_hz", 5000.0),
//! ]);
//! assert!(validate_descriptor(&good).is_ok());
//!
//! let bad = EffectChainDescriptor::new(vec![EffectEntry::new("Flanger")]);
//! assert!(validate_descriptor(&bad).is_err());
//! ```

use stemfx_engine::export::renderer_params;
use stemfx_engine::{EffectChainDescriptor, EffectEntry};
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown effect type.
    #[error("entry {index}: unknown effect type '{effect_type}'")]
    UnknownEffect {
        /// Position of the entry in the descriptor.
        index: usize,
        /// The unrecognized type name.
        effect_type: String,
    },

    /// Unknown parameter name.
    #[error("entry {index}: unknown parameter '{param}' for effect '{effect_type}'")]
    UnknownParameter {
        /// Position of the entry in the descriptor.
        index: usize,
        /// Effect type of the entry.
        effect_type: String,
        /// Name of the unrecognized parameter.
        param: String,
    },

    /// Parameter value is NaN or infinite.
    #[error("entry {index}: parameter '{param}' of '{effect_type}' is not finite")]
    NonFinite {
        /// Position of the entry in the descriptor.
        index: usize,
        /// Effect type of the entry.
        effect_type: String,
        /// Name of the parameter.
        param: String,
    },

    /// Region bounds are negative, non-finite, or out of order.
    #[error("entry {index}: invalid region [{start:?}, {end:?}]")]
    InvalidRegion {
        /// Position of the entry in the descriptor.
        index: usize,
        /// Region start in seconds.
        start: Option<f64>,
        /// Region end in seconds.
        end: Option<f64>,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Flattens this error into its individual problems.
    pub fn into_vec(self) -> Vec<ValidationError> {
        match self {
            ValidationError::Multiple(errors) => errors,
            other => vec![other],
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a single entry at position `index`, collecting every problem.
pub fn validate_entry(index: usize, entry: &EffectEntry) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    match renderer_params(&entry.effect_type) {
        None => errors.push(ValidationError::UnknownEffect {
            index,
            effect_type: entry.effect_type.clone(),
        }),
        Some(accepted) => {
            for (name, value) in &entry.params {
                if !accepted.contains(&name.as_str()) {
                    errors.push(ValidationError::UnknownParameter {
                        index,
                        effect_type: entry.effect_type.clone(),
                        param: name.clone(),
                    });
                } else if !value.is_finite() {
                    errors.push(ValidationError::NonFinite {
                        index,
                        effect_type: entry.effect_type.clone(),
                        param: name.clone(),
                    });
                }
            }
        }
    }

    if !region_is_valid(entry.start_time, entry.end_time) {
        errors.push(ValidationError::InvalidRegion {
            index,
            start: entry.start_time,
            end: entry.end_time,
        });
    }

    errors
}

fn region_is_valid(start: Option<f64>, end: Option<f64>) -> bool {
    let bound_ok = |t: Option<f64>| t.is_none_or(|t| t.is_finite() && t >= 0.0);
    if !bound_ok(start) || !bound_ok(end) {
        return false;
    }
    match (start, end) {
        (Some(s), Some(e)) => e > s,
        _ => true,
    }
}

/// Validates every entry of a descriptor.
///
/// A single problem is returned as-is; several are wrapped in
/// [`ValidationError::Multiple`].
pub fn validate_descriptor(descriptor: &EffectChainDescriptor) -> ValidationResult<()> {
    let mut errors: Vec<ValidationError> = descriptor
        .iter()
        .enumerate()
        .flat_map(|(index, entry)| validate_entry(index, entry))
        .collect();

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
