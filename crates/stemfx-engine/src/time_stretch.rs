//! Time-stretch extension integration.
//!
//! The extension is a native processor node spliced between the transport
//! source and the input stage:
//!
//! ```text
//! before:  source ──────────────→ input → … → master
//! after:   source → stretch node → input → … → master
//! ```
//!
//! Lifecycle: `Unavailable → Loading → Ready | Failed`. Failure is permanent
//! for the engine instance and never disconnects audio: if the splice cannot
//! complete, the source stays (or is put back) on the input stage. While not
//! ready, [`set_playback_rate`](AudioEngine::set_playback_rate) and
//! [`set_pitch_ratio`](AudioEngine::set_pitch_ratio) are no-ops that record
//! a warning.

use core::fmt;

use serde::{Deserialize, Serialize};
use stemfx_core::{AudioRuntime, ExtensionError, NativeExtension, NodeHandle};

use crate::engine::AudioEngine;
use crate::error::EngineWarning;

/// Module path the extension is loaded from by default.
pub const DEFAULT_MODULE_PATH: &str = "/rubberband-processor.js";

/// Processor name registered by the default module.
pub const DEFAULT_PROCESSOR_NAME: &str = "rubberband-processor";

/// Extension parameter scaling playback speed (1.0 = unmodified).
pub const TEMPO_PARAM: &str = "tempo";

/// Extension parameter scaling pitch (1.0 = unmodified).
pub const PITCH_PARAM: &str = "pitch";

/// Time-stretch extension settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeStretchOptions {
    /// Whether initialization is attempted at all.
    pub enabled: bool,
    /// Path of the processing module.
    pub module_path: String,
    /// Processor name the module registers.
    pub processor_name: String,
}

impl Default for TimeStretchOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            module_path: DEFAULT_MODULE_PATH.to_string(),
            processor_name: DEFAULT_PROCESSOR_NAME.to_string(),
        }
    }
}

/// Queryable lifecycle state of the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeStretchState {
    /// Not initialized.
    Unavailable,
    /// Module load in progress.
    Loading,
    /// Spliced into the signal path.
    Ready,
    /// Initialization failed; permanently inert.
    Failed,
}

impl fmt::Display for TimeStretchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeStretchState::Unavailable => "unavailable",
            TimeStretchState::Loading => "loading",
            TimeStretchState::Ready => "ready",
            TimeStretchState::Failed => "failed",
        })
    }
}

/// Extension lifecycle with the data each state owns.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TimeStretch {
    Unavailable,
    Loading,
    Ready { node: NodeHandle },
    Failed { reason: String },
}

impl TimeStretch {
    pub(crate) fn state(&self) -> TimeStretchState {
        match self {
            TimeStretch::Unavailable => TimeStretchState::Unavailable,
            TimeStretch::Loading => TimeStretchState::Loading,
            TimeStretch::Ready { .. } => TimeStretchState::Ready,
            TimeStretch::Failed { .. } => TimeStretchState::Failed,
        }
    }
}

/// Reason recorded when initialization is dropped before it finishes.
pub const CANCELLED_REASON: &str = "initialization cancelled";

/// Marks an unfinished load as failed when dropped.
struct LoadingGuard<'a, R: AudioRuntime> {
    engine: &'a mut AudioEngine<R>,
}

impl<R: AudioRuntime> Drop for LoadingGuard<'_, R> {
    fn drop(&mut self) {
        if self.engine.time_stretch == TimeStretch::Loading {
            self.engine.time_stretch = TimeStretch::Failed {
                reason: CANCELLED_REASON.to_string(),
            };
            self.engine.warn(EngineWarning::TimeStretchFailed {
                reason: CANCELLED_REASON.to_string(),
            });
        }
    }
}

impl<R: AudioRuntime + NativeExtension> AudioEngine<R> {
    /// Loads the extension and splices it in front of the input stage.
    ///
    /// Runs at most once per engine: later calls return the current state
    /// with a warning. Failure is reported as a warning and leaves the
    /// source connected to the input stage.
    pub async fn init_time_stretch(&mut self) -> TimeStretchState {
        if self.time_stretch != TimeStretch::Unavailable {
            let state = self.time_stretch.state();
            self.warn(EngineWarning::TimeStretchNoRetry { state });
            return state;
        }
        if !self.options.time_stretch.enabled {
            self.warn(EngineWarning::TimeStretchDisabled);
            return self.time_stretch.state();
        }

        self.time_stretch = TimeStretch::Loading;
        let path = self.options.time_stretch.module_path.clone();
        tracing::info!(module = %path, "loading time-stretch module");

        // Dropping this future mid-load resolves Loading to Failed.
        let mut guard = LoadingGuard { engine: self };
        let outcome = guard.engine.splice(&path).await;
        let engine = &mut *guard.engine;
        engine.time_stretch = match outcome {
            Ok(node) => {
                tracing::info!(%node, "time-stretch ready");
                TimeStretch::Ready { node }
            }
            Err(err) => {
                let reason = err.to_string();
                engine.warn(EngineWarning::TimeStretchFailed {
                    reason: reason.clone(),
                });
                TimeStretch::Failed { reason }
            }
        };
        engine.time_stretch.state()
    }

    async fn splice(&mut self, path: &str) -> Result<NodeHandle, ExtensionError> {
        self.runtime.load_module(path).await?;
        let processor = self.options.time_stretch.processor_name.clone();
        let node = self
            .runtime
            .create_extension_node(&processor, &[(PITCH_PARAM, 1.0), (TEMPO_PARAM, 1.0)])?;

        let input = self.graph.input();
        self.runtime.connect(node, input)?;

        if let Some(source) = self.source {
            self.runtime.disconnect(source)?;
            if let Err(err) = self.runtime.connect(source, node) {
                // Put the direct path back so audio keeps flowing.
                self.runtime.connect(source, input)?;
                self.runtime.disconnect(node)?;
                return Err(err.into());
            }
        }
        Ok(node)
    }
}

impl<R: AudioRuntime> AudioEngine<R> {
    /// Playback speed ratio (1.0 = normal), pitch unchanged.
    pub fn set_playback_rate(&mut self, ratio: f64) {
        self.write_stretch("set_playback_rate", TEMPO_PARAM, ratio);
    }

    /// Pitch ratio (2.0 = one octave up), speed unchanged.
    pub fn set_pitch_ratio(&mut self, ratio: f64) {
        self.write_stretch("set_pitch_ratio", PITCH_PARAM, ratio);
    }

    /// Current playback speed ratio, if the extension is ready.
    pub fn playback_rate(&self) -> Option<f64> {
        self.read_stretch(TEMPO_PARAM)
    }

    /// Current pitch ratio, if the extension is ready.
    pub fn pitch_ratio(&self) -> Option<f64> {
        self.read_stretch(PITCH_PARAM)
    }

    /// Why time-stretch failed, if it did.
    pub fn time_stretch_failure(&self) -> Option<&str> {
        match &self.time_stretch {
            TimeStretch::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    fn read_stretch(&self, param: &str) -> Option<f64> {
        match self.time_stretch {
            TimeStretch::Ready { node } => self.runtime.param(node, param),
            _ => None,
        }
    }

    fn write_stretch(&mut self, control: &'static str, param: &'static str, ratio: f64) {
        let TimeStretch::Ready { node } = self.time_stretch else {
            let state = self.time_stretch.state();
            self.warn(EngineWarning::TimeStretchInactive { control, state });
            return;
        };
        if !ratio.is_finite() || ratio <= 0.0 {
            self.warn(EngineWarning::InvalidRatio {
                control,
                value: ratio,
            });
            return;
        }
        match self.runtime.set_param(node, param, ratio) {
            Ok(()) => tracing::debug!(param, ratio, "time-stretch ratio set"),
            Err(err) => self.warn(EngineWarning::StretchRejected {
                control,
                reason: err.to_string(),
            }),
        }
    }
}
