//! Boundaries to the external audio-node runtime and native extensions.
//!
//! The engine never performs sample-level DSP itself. It drives a runtime
//! that offers a small capability set: create a stage of a kind with initial
//! parameters, connect and disconnect stages, read and write named runtime
//! parameters, load a source by locator, and start/stop playback. Any runtime
//! offering [`AudioRuntime`] is substitutable.
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │           AudioEngine            │
//! │ registry · graph · export · TS   │
//! └──────────────┬───────────────────┘
//!                │ AudioRuntime (+ NativeExtension for time-stretch)
//!                ▼
//! ┌──────────────────────────────────┐
//! │   audio-node runtime (external)  │
//! └──────────────────────────────────┘
//! ```
//!
//! Loading a source and loading an extension module are the only operations
//! that suspend; both are expressed as futures so the host can await them on
//! whatever executor it already runs.

use core::fmt;
use core::future::Future;

use crate::stage::StageKind;

/// Opaque handle to a node owned by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub u32);

impl NodeHandle {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Errors reported by the audio-node runtime.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    /// The handle does not name a live node.
    #[error("unknown node: {0}")]
    UnknownNode(NodeHandle),

    /// The node has no runtime parameter with this name.
    #[error("{node} has no parameter '{name}'")]
    UnknownParam {
        /// Node that was addressed.
        node: NodeHandle,
        /// Parameter name that was not found.
        name: String,
    },

    /// A source could not be loaded or decoded.
    #[error("failed to load source '{0}'")]
    SourceUnavailable(String),

    /// Any other runtime failure.
    #[error("audio runtime error: {0}")]
    Backend(String),
}

/// Errors reported while loading or instantiating a native extension.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtensionError {
    /// The processing module could not be found at the given path.
    #[error("extension module not found: {0}")]
    ModuleNotFound(String),

    /// The module loaded but does not register the requested processor.
    #[error("extension processor unavailable: {0}")]
    ProcessorUnavailable(String),

    /// The runtime failed while splicing the extension node.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Capability set the engine consumes from an audio-node runtime.
pub trait AudioRuntime {
    /// Create a stage of the given kind with initial runtime parameters.
    fn create_stage(
        &mut self,
        kind: StageKind,
        params: &[(&'static str, f64)],
    ) -> Result<NodeHandle, RuntimeError>;

    /// Connect `from`'s output to `to`'s input.
    fn connect(&mut self, from: NodeHandle, to: NodeHandle) -> Result<(), RuntimeError>;

    /// Remove every outgoing connection of `node`.
    fn disconnect(&mut self, node: NodeHandle) -> Result<(), RuntimeError>;

    /// Connect `node` to the hardware destination.
    fn connect_to_destination(&mut self, node: NodeHandle) -> Result<(), RuntimeError>;

    /// Read a named runtime parameter.
    fn param(&self, node: NodeHandle, name: &str) -> Option<f64>;

    /// Write a named runtime parameter; takes effect immediately.
    fn set_param(&mut self, node: NodeHandle, name: &str, value: f64) -> Result<(), RuntimeError>;

    /// Load and decode a source by locator, returning its transport node.
    fn load_source(
        &mut self,
        locator: &str,
    ) -> impl Future<Output = Result<NodeHandle, RuntimeError>>;

    /// Start playback of a loaded source.
    fn start(&mut self, source: NodeHandle) -> Result<(), RuntimeError>;

    /// Stop playback of a loaded source.
    fn stop(&mut self, source: NodeHandle) -> Result<(), RuntimeError>;
}

/// Optional capability set for native processing extensions.
///
/// Nodes created here live in the same handle space as [`AudioRuntime`]
/// nodes, so they are connected and parameterized through that trait.
pub trait NativeExtension {
    /// Load a processing module from a well-known path.
    fn load_module(&mut self, path: &str) -> impl Future<Output = Result<(), ExtensionError>>;

    /// Instantiate a node of a processor registered by a loaded module.
    fn create_extension_node(
        &mut self,
        processor: &str,
        params: &[(&'static str, f64)],
    ) -> Result<NodeHandle, ExtensionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RuntimeError::UnknownParam {
            node: NodeHandle(3),
            name: "wet".to_string(),
        };
        assert_eq!(err.to_string(), "node#3 has no parameter 'wet'");

        let err = ExtensionError::ModuleNotFound("/rubberband-processor.js".to_string());
        assert_eq!(
            err.to_string(),
            "extension module not found: /rubberband-processor.js"
        );
    }

    #[test]
    fn test_runtime_error_converts_to_extension_error() {
        let err: ExtensionError = RuntimeError::UnknownNode(NodeHandle(1)).into();
        assert_eq!(err.to_string(), "unknown node: node#1");
    }
}
