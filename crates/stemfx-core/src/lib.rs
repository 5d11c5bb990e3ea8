//! stemfx Core - shared types for the stem effect-chain engine
//!
//! This crate provides the vocabulary every other stemfx crate speaks.
//!
//! # Core Abstractions
//!
//! ## Stages
//!
//! - [`StageKind`] - Closed palette of processing building blocks
//! - [`StageId`] - The fixed slots of the signal graph, with [`StageId::SIGNAL_ORDER`]
//!
//! ## Parameters
//!
//! - [`ParamDescriptor`] - Name, unit, range, and neutral default of a stage parameter
//! - [`ParamUnit`] - Display units
//!
//! ## Units and Time
//!
//! - [`linear_to_db`] / [`db_to_linear`], [`seconds_to_ms`]
//! - [`NoteDivision`] / [`DelayTime`] - Tempo-relative delay notation (`"8n"`)
//!
//! ## Runtime Boundaries
//!
//! - [`AudioRuntime`] - The audio-node runtime the engine drives
//! - [`NativeExtension`] - Optional native processor modules (time-stretch)
//!
//! # Example
//!
//! ```rust
//! use stemfx_core::{StageId, StageKind, linear_to_db};
//!
//! assert_eq!(StageId::SIGNAL_ORDER[0], StageId::Input);
//! assert_eq!(StageId::Lowpass.kind(), StageKind::LowpassFilter);
//! assert!((linear_to_db(2.0) - 6.02).abs() < 0.01);
//! ```

pub mod math;
pub mod param_info;
pub mod runtime;
pub mod stage;
pub mod tempo;

pub use math::{MIN_LINEAR_GAIN, db_to_linear, linear_to_db, ms_to_seconds, seconds_to_ms};
pub use param_info::{ParamDescriptor, ParamUnit};
pub use runtime::{AudioRuntime, ExtensionError, NativeExtension, NodeHandle, RuntimeError};
pub use stage::{StageCategory, StageId, StageKind, UnknownStage};
pub use tempo::{DelayTime, InvalidNotation, NoteDivision};
