//! Configuration and session management for stemfx.
//!
//! # Features
//!
//! - **Engine config**: tempo, range policy, and time-stretch settings from TOML
//! - **Sessions**: named parameter snapshots that can be captured from and applied to an engine
//! - **Validation**: check an exported descriptor against the renderer schema
//! - **Paths**: platform-specific config and session directories
//!
//! # Example
//!
//! ```rust
//! use stemfx_config::{EngineConfig, Session, StageSettings};
//! use stemfx_core::StageId;
//! use stemfx_engine::{AudioEngine, HeadlessRuntime};
//!
//! let config = EngineConfig::from_toml("bpm = 96.0").unwrap();
//! let mut engine = AudioEngine::new(HeadlessRuntime::new(), config.engine_options()).unwrap();
//!
//! let session = Session::new("Dark")
//!     .with_stage(StageSettings::new(StageId::Lowpass).with_param("frequency", 3000.0));
//! session.apply(&mut engine).unwrap();
//!
//! stemfx_config::validate_descriptor(&engine.export()).unwrap();
//! ```

mod engine_config;
mod error;
mod session;

/// Platform-specific paths for configuration and sessions.
pub mod paths;

/// Descriptor validation.
pub mod validation;

pub use engine_config::{EngineConfig, ExportConfig};
pub use error::ConfigError;
pub use paths::{find_session, list_sessions, user_config_dir, user_config_file, user_sessions_dir};
pub use session::{Session, StageSettings};
pub use validation::{ValidationError, ValidationResult, validate_descriptor, validate_entry};

use stemfx_engine::EffectChainDescriptor;

/// Parse descriptor JSON and validate it.
pub fn validate_descriptor_json(json: &str) -> Result<EffectChainDescriptor, ConfigError> {
    let descriptor = EffectChainDescriptor::from_json(json)?;
    validate_descriptor(&descriptor)?;
    Ok(descriptor)
}

/// Read a descriptor JSON file and validate it.
pub fn load_descriptor(path: impl AsRef<std::path::Path>) -> Result<EffectChainDescriptor, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    validate_descriptor_json(&content)
}
