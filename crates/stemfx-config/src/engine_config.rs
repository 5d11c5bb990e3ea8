//! Engine configuration file.

use crate::ConfigError;
use crate::paths::{ensure_parent, user_config_file};
use serde::{Deserialize, Serialize};
use std::path::Path;
use stemfx_engine::{DEFAULT_BPM, EngineOptions, OutOfRangePolicy, TimeStretchOptions};

/// Export output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Pretty-print descriptor JSON.
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Engine configuration, read from TOML.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// ```toml
/// bpm = 96.0
/// out_of_range = "pass_through"
///
/// [time_stretch]
/// enabled = true
/// module_path = "/rubberband-processor.js"
/// processor_name = "rubberband-processor"
///
/// [export]
/// pretty = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tempo used to resolve note-valued delay times.
    pub bpm: f64,
    /// Range policy applied by setters.
    pub out_of_range: OutOfRangePolicy,
    /// Time-stretch extension settings.
    pub time_stretch: TimeStretchOptions,
    /// Export output settings.
    pub export: ExportConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            out_of_range: OutOfRangePolicy::default(),
            time_stretch: TimeStretchOptions::default(),
            export: ExportConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Load from `path` if given, else the user config file if present,
    /// else the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default_path = user_config_file();
        if default_path.is_file() {
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        ensure_parent(path)?;
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check field values the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            return Err(ConfigError::invalid_value(
                "bpm",
                format!("{} is not a positive tempo", self.bpm),
            ));
        }
        if self.time_stretch.processor_name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "time_stretch.processor_name",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// Engine construction options for this configuration.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            bpm: self.bpm,
            out_of_range: self.out_of_range,
            time_stretch: self.time_stretch.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_toml_is_default() {
        let config = EngineConfig::from_toml("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.bpm, 120.0);
        assert_eq!(config.out_of_range, OutOfRangePolicy::Clamp);
        assert!(config.time_stretch.enabled);
        assert!(config.export.pretty);
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml(
            r#"
            out_of_range = "pass_through"

            [time_stretch]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.out_of_range, OutOfRangePolicy::PassThrough);
        assert!(!config.time_stretch.enabled);
        assert_eq!(config.time_stretch.module_path, "/rubberband-processor.js");
        assert_eq!(config.bpm, 120.0);
    }

    #[test]
    fn test_invalid_bpm_rejected() {
        let err = EngineConfig::from_toml("bpm = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "bpm"));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = EngineConfig::from_toml(r#"out_of_range = "wrap""#).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");

        let config = EngineConfig {
            bpm: 90.0,
            export: ExportConfig { pretty: false },
            ..EngineConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(EngineConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/stemfx.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_load_or_default_explicit_path_must_exist() {
        assert!(EngineConfig::load_or_default(Some(Path::new("/nonexistent/c.toml"))).is_err());
    }

    #[test]
    fn test_engine_options() {
        let config = EngineConfig::from_toml("bpm = 100.0").unwrap();
        let options = config.engine_options();
        assert_eq!(options.bpm, 100.0);
        assert_eq!(options.time_stretch, config.time_stretch);
    }
}
