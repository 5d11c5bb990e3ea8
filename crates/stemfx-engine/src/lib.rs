//! Effect-chain engine for a single audio stem.
//!
//! The engine shapes one stem through a fixed serial chain of stages driven
//! by an external audio-node runtime, and snapshots the audible state as an
//! [`EffectChainDescriptor`] an offline renderer can reproduce.
//!
//! # Components
//!
//! - [`NodeRegistry`](stemfx_registry::NodeRegistry) - one stage per slot, neutral defaults
//! - [`SignalGraph`] - fixed wiring in signal order, master to destination
//! - [`AudioEngine`] - the parameter control surface
//! - [`activity`] - which stages are "on", inferred from parameter values
//! - [`export`] - serialization in renderer units, with documented approximations
//! - [`time_stretch`] - optional native tempo/pitch extension
//! - [`HeadlessRuntime`] - in-memory runtime for offline use and tests
//!
//! # Example
//!
//! ```rust
//! use stemfx_engine::{AudioEngine, EngineOptions, HeadlessRuntime, TimeStretchState};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let runtime = HeadlessRuntime::new().with_source("stems/drums.wav");
//! let mut engine = AudioEngine::new(runtime, EngineOptions::default()).unwrap();
//! engine.initialize("stems/drums.wav").await.unwrap();
//!
//! // No module registered: time-stretch fails and stays inert
//! assert_eq!(engine.init_time_stretch().await, TimeStretchState::Failed);
//! engine.set_playback_rate(1.2);
//! assert!(!engine.warnings().is_empty());
//!
//! engine.set_reverb(0.4);
//! let json = engine.export().to_json().unwrap();
//! assert_eq!(json, r#"[{"type":"Reverb","params":{"dry_level":0.6,"room_size":0.5,"wet_level":0.4}}]"#);
//! # }
//! ```

pub mod activity;
mod engine;
mod error;
pub mod export;
mod graph;
mod headless;
pub mod time_stretch;

pub use activity::{active_stages, is_active};
pub use engine::{AudioEngine, DEFAULT_BPM, EngineOptions, OutOfRangePolicy};
pub use error::{EngineError, EngineWarning};
pub use export::{
    Approximation, EXPORT_ORDER, EffectChainDescriptor, EffectEntry, approximations, renderer_type,
};
pub use graph::SignalGraph;
pub use headless::{HeadlessRuntime, NodeLabel};
pub use time_stretch::{TimeStretchOptions, TimeStretchState};
