//! Engine errors and warnings.

use core::fmt;

use stemfx_core::{RuntimeError, StageId};
use stemfx_registry::RegistryError;

use crate::time_stretch::TimeStretchState;

/// Errors that abort an engine operation.
///
/// Degraded optional features never produce an error; they are reported as
/// [`EngineWarning`]s instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The audio-node runtime failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// A parameter name did not resolve.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Non-fatal conditions surfaced to the host.
///
/// Every warning is logged through `tracing` and kept in the engine's
/// warning log until taken.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineWarning {
    /// A value outside the documented range was clamped.
    Clamped {
        /// Stage addressed.
        stage: StageId,
        /// Parameter addressed.
        param: &'static str,
        /// Value the caller asked for.
        requested: f64,
        /// Value written.
        applied: f64,
    },

    /// A value outside the documented range was written unchanged.
    OutOfRange {
        /// Stage addressed.
        stage: StageId,
        /// Parameter addressed.
        param: &'static str,
        /// Value written.
        value: f64,
    },

    /// A NaN or infinite value was ignored.
    NonFinite {
        /// Stage addressed.
        stage: StageId,
        /// Parameter addressed.
        param: &'static str,
    },

    /// The runtime refused a value; the registry keeps the previous one.
    RuntimeRejected {
        /// Stage addressed.
        stage: StageId,
        /// Parameter addressed.
        param: &'static str,
        /// Runtime error text.
        reason: String,
    },

    /// A tempo of zero, negative, or non-finite BPM was ignored.
    InvalidTempo {
        /// Requested BPM.
        bpm: f64,
    },

    /// Time-stretch is disabled in the engine options.
    TimeStretchDisabled,

    /// Time-stretch initialization failed; the feature stays inert.
    TimeStretchFailed {
        /// Why initialization failed.
        reason: String,
    },

    /// Time-stretch initialization was requested again after it had run.
    TimeStretchNoRetry {
        /// State the extension is in.
        state: TimeStretchState,
    },

    /// A time-stretch control was called while the extension is not ready.
    TimeStretchInactive {
        /// Control that was called.
        control: &'static str,
        /// State the extension is in.
        state: TimeStretchState,
    },

    /// A time-stretch ratio that is not a positive finite number was ignored.
    InvalidRatio {
        /// Control that was called.
        control: &'static str,
        /// Requested ratio.
        value: f64,
    },

    /// The stretch node refused a ratio.
    StretchRejected {
        /// Control that was called.
        control: &'static str,
        /// Runtime error text.
        reason: String,
    },

    /// A transport control was called before a source was loaded.
    NoSource {
        /// Transport action attempted.
        action: &'static str,
    },
}

impl fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineWarning::Clamped {
                stage,
                param,
                requested,
                applied,
            } => write!(f, "{stage}.{param}: {requested} out of range, clamped to {applied}"),
            EngineWarning::OutOfRange {
                stage,
                param,
                value,
            } => write!(f, "{stage}.{param}: {value} out of range, passed through"),
            EngineWarning::NonFinite { stage, param } => {
                write!(f, "{stage}.{param}: non-finite value ignored")
            }
            EngineWarning::RuntimeRejected {
                stage,
                param,
                reason,
            } => write!(f, "{stage}.{param}: runtime rejected value: {reason}"),
            EngineWarning::InvalidTempo { bpm } => write!(f, "invalid tempo {bpm} BPM ignored"),
            EngineWarning::TimeStretchDisabled => f.write_str("time-stretch is disabled"),
            EngineWarning::TimeStretchFailed { reason } => {
                write!(f, "time-stretch unavailable: {reason}")
            }
            EngineWarning::TimeStretchNoRetry { state } => {
                write!(f, "time-stretch already initialized ({state}); not retrying")
            }
            EngineWarning::TimeStretchInactive { control, state } => {
                write!(f, "{control} ignored: time-stretch is {state}")
            }
            EngineWarning::InvalidRatio { control, value } => {
                write!(f, "{control} ignored: ratio {value} must be positive")
            }
            EngineWarning::StretchRejected { control, reason } => {
                write!(f, "{control}: runtime rejected ratio: {reason}")
            }
            EngineWarning::NoSource { action } => write!(f, "{action} ignored: no source loaded"),
        }
    }
}
