//! Session files: named parameter snapshots applied to an engine.

use crate::ConfigError;
use crate::paths::ensure_parent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use stemfx_core::{AudioRuntime, DelayTime, StageId};
use stemfx_engine::AudioEngine;

/// Parameter values for one stage slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSettings {
    /// Slot identifier, e.g. `"lowpass"` or `"noise_gate"`.
    pub stage: String,
    /// Parameter values in runtime units, keyed by parameter name.
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

impl StageSettings {
    /// Settings for `stage` with no parameters.
    pub fn new(stage: StageId) -> Self {
        Self {
            stage: stage.as_str().to_string(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter value.
    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Resolve the slot this entry names.
    pub fn stage_id(&self) -> Result<StageId, ConfigError> {
        self.stage
            .parse()
            .map_err(|_| ConfigError::UnknownStage(self.stage.clone()))
    }
}

/// A saved engine state.
///
/// ```toml
/// name = "Lo-fi drums"
/// bpm = 96.0
/// delay_time = "8n."
///
/// [[stages]]
/// stage = "lowpass"
/// params = { frequency = 5000.0 }
///
/// [[stages]]
/// stage = "delay"
/// params = { feedback = 0.3, wet = 0.25 }
/// ```
///
/// Stages not listed keep their neutral defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session name.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tempo; the engine's tempo is kept when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<f64>,
    /// Delay time as notation (`"4n."`), `"250ms"`, or seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_time: Option<String>,
    /// Per-stage parameter values.
    #[serde(default)]
    pub stages: Vec<StageSettings>,
}

impl Session {
    /// Create an empty session.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            bpm: None,
            delay_time: None,
            stages: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the tempo.
    pub fn with_bpm(mut self, bpm: f64) -> Self {
        self.bpm = Some(bpm);
        self
    }

    /// Set the delay time notation.
    pub fn with_delay_time(mut self, delay_time: impl Into<String>) -> Self {
        self.delay_time = Some(delay_time.into());
        self
    }

    /// Add a stage entry.
    pub fn with_stage(mut self, settings: StageSettings) -> Self {
        self.stages.push(settings);
        self
    }

    /// Snapshot every non-default parameter of `engine`.
    ///
    /// A tempo-relative delay time is kept as notation rather than seconds.
    pub fn capture<R: AudioRuntime>(name: impl Into<String>, engine: &AudioEngine<R>) -> Self {
        let note = match engine.delay_time() {
            DelayTime::Note(division) => Some(division),
            DelayTime::Seconds(_) => None,
        };

        let stages = engine
            .registry()
            .iter()
            .filter_map(|stage| {
                let params: BTreeMap<String, f64> = stage
                    .params()
                    .filter(|(desc, value)| !desc.is_default(*value))
                    .filter(|(desc, _)| {
                        !(note.is_some() && stage.id() == StageId::Delay && desc.name == "delay_time")
                    })
                    .map(|(desc, value)| (desc.name.to_string(), value))
                    .collect();
                (!params.is_empty()).then(|| StageSettings {
                    stage: stage.id().as_str().to_string(),
                    params,
                })
            })
            .collect();

        Self {
            name: name.into(),
            description: None,
            bpm: Some(engine.bpm()),
            delay_time: note.map(|division| division.to_string()),
            stages,
        }
    }

    /// Load a session from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a session from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the session to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        ensure_parent(path)?;
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the session to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write this session into `engine`.
    ///
    /// Stage names, parameter names, the tempo, and the delay time are all
    /// checked before anything is written, so a bad session leaves the
    /// engine untouched. Out-of-range values are handled by the engine's
    /// range policy and show up as warnings.
    pub fn apply<R: AudioRuntime>(&self, engine: &mut AudioEngine<R>) -> Result<(), ConfigError> {
        if let Some(bpm) = self.bpm
            && (!bpm.is_finite() || bpm <= 0.0)
        {
            return Err(ConfigError::invalid_value(
                "bpm",
                format!("{} is not a positive tempo", bpm),
            ));
        }
        let delay_time = self
            .delay_time
            .as_deref()
            .map(|s| {
                s.parse::<DelayTime>()
                    .map_err(|e| ConfigError::invalid_value("delay_time", e.to_string()))
            })
            .transpose()?;

        let mut writes = Vec::new();
        for settings in &self.stages {
            let id = settings.stage_id()?;
            for (name, value) in &settings.params {
                engine
                    .registry()
                    .param_descriptor(id, name)
                    .map_err(stemfx_engine::EngineError::from)?;
                writes.push((id, name.as_str(), *value));
            }
        }

        if let Some(bpm) = self.bpm {
            engine.set_bpm(bpm);
        }
        for (id, name, value) in writes {
            if id == StageId::Distortion && name == "distortion" {
                engine.set_distortion(value);
            } else {
                engine.set_param(id, name, value)?;
            }
        }
        if let Some(time) = delay_time {
            engine.set_delay_time(time);
        }

        tracing::info!(session = %self.name, stages = self.stages.len(), "session applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stemfx_engine::{EngineOptions, HeadlessRuntime};

    fn engine() -> AudioEngine<HeadlessRuntime> {
        AudioEngine::new(HeadlessRuntime::new(), EngineOptions::default()).unwrap()
    }

    #[test]
    fn test_parse_session() {
        let session = Session::from_toml(
            r#"
            name = "Lo-fi"
            bpm = 90.0

            [[stages]]
            stage = "lowpass"
            params = { frequency = 5000.0 }

            [[stages]]
            stage = "bit-crusher"
            params = { bits = 8.0 }
            "#,
        )
        .unwrap();
        assert_eq!(session.name, "Lo-fi");
        assert_eq!(session.bpm, Some(90.0));
        assert_eq!(session.stages.len(), 2);
        assert_eq!(session.stages[1].stage_id().unwrap(), StageId::BitCrusher);
    }

    #[test]
    fn test_apply_writes_engine() {
        let session = Session::new("test")
            .with_stage(StageSettings::new(StageId::Lowpass).with_param("frequency", 5000.0))
            .with_stage(StageSettings::new(StageId::Reverb).with_param("wet", 0.4));
        let mut engine = engine();
        session.apply(&mut engine).unwrap();

        assert_eq!(engine.param(StageId::Lowpass, "frequency").unwrap(), 5000.0);
        assert_eq!(
            engine.export().types(),
            vec!["LowpassFilter", "Reverb"]
        );
    }

    #[test]
    fn test_apply_distortion_toggles_wet() {
        let session = Session::new("drive")
            .with_stage(StageSettings::new(StageId::Distortion).with_param("distortion", 0.3));
        let mut engine = engine();
        session.apply(&mut engine).unwrap();
        assert_eq!(engine.param(StageId::Distortion, "wet").unwrap(), 1.0);
    }

    #[test]
    fn test_apply_note_delay_after_bpm() {
        let session = Session::new("dotted").with_bpm(100.0).with_delay_time("4n.");
        let mut engine = engine();
        session.apply(&mut engine).unwrap();
        assert!((engine.param(StageId::Delay, "delay_time").unwrap() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_stage_leaves_engine_untouched() {
        let session = Session::new("bad")
            .with_stage(StageSettings::new(StageId::Lowpass).with_param("frequency", 5000.0))
            .with_stage(StageSettings {
                stage: "flanger".to_string(),
                params: BTreeMap::new(),
            });
        let mut engine = engine();
        let err = session.apply(&mut engine).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownStage(ref s) if s == "flanger"));
        assert!(engine.export().is_empty());
    }

    #[test]
    fn test_unknown_param_rejected() {
        let session = Session::new("bad")
            .with_stage(StageSettings::new(StageId::Lowpass).with_param("cutoff", 5000.0));
        let mut engine = engine();
        assert!(matches!(
            session.apply(&mut engine),
            Err(ConfigError::Engine(_))
        ));
        assert!(engine.export().is_empty());
    }

    #[test]
    fn test_bad_delay_time_rejected() {
        let session = Session::new("bad").with_delay_time("3q");
        let err = session.apply(&mut engine()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "delay_time"));
    }

    #[test]
    fn test_capture_only_non_defaults() {
        let mut engine = engine();
        engine.set_lowpass(5000.0);
        engine.set_delay(0.3, 0.25);
        engine.set_delay_time("8t".parse::<DelayTime>().unwrap());

        let session = Session::capture("snap", &engine);
        assert_eq!(session.bpm, Some(120.0));
        assert_eq!(session.delay_time.as_deref(), Some("8t"));
        let stages: Vec<&str> = session.stages.iter().map(|s| s.stage.as_str()).collect();
        assert_eq!(stages, vec!["lowpass", "delay"]);
        assert!(!session.stages[1].params.contains_key("delay_time"));
    }

    #[test]
    fn test_capture_then_apply_reproduces_export() {
        let mut original = engine();
        original.set_compressor_threshold(-18.0);
        original.set_distortion(0.4);
        original.set_peaking(2500.0, 3.0, 1.2);
        original.set_pan(-0.5);

        let session = Session::capture("copy", &original);
        let toml = session.to_toml().unwrap();
        let mut restored = engine();
        Session::from_toml(&toml).unwrap().apply(&mut restored).unwrap();

        assert_eq!(restored.export(), original.export());
    }
}
