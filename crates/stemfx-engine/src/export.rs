//! Export serializer.
//!
//! Converts registry state into an [`EffectChainDescriptor`]: the ordered
//! list of active stages, each named by the offline renderer's effect type
//! with parameters in the renderer's units.
//!
//! # Wire format
//!
//! ```json
//! [
//!   {"type": "LowpassFilter", "params": {"cutoff_hz": 5000.0}},
//!   {"type": "Distortion", "params": {"drive_db": 6.0}}
//! ]
//! ```
//!
//! Entries may carry `start_time` / `end_time` in seconds to restrict
//! processing to a region. `"name"` is accepted in place of `"type"` when
//! reading.
//!
//! # Approximations
//!
//! Some stages have no exact renderer equivalent. Their mappings use the
//! named constants below and are listed by [`approximations`] so a host can
//! surface the fidelity loss.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stemfx_core::{StageId, linear_to_db, seconds_to_ms};
use stemfx_registry::{NodeRegistry, Stage};

use crate::activity::is_active;

/// Normalized distortion amount (0–1) to renderer drive in dB.
pub const DISTORTION_DRIVE_DB_SCALE: f64 = 20.0;

/// Room size sent for every reverb; decay time has no renderer equivalent.
pub const REVERB_ROOM_SIZE: f64 = 0.5;

/// Octave span that maps to a phaser depth of 1.0.
pub const PHASER_MAX_OCTAVES: f64 = 8.0;

/// Feedback sent for modulation stages that have none.
pub const MODULATION_FEEDBACK: f64 = 0.0;

/// Order in which active stages are emitted.
///
/// Signal order, except that the drive group (distortion, bit reduction,
/// waveshaper) follows the spectral-shaping filters, matching the renderer's
/// reference chain.
pub const EXPORT_ORDER: [StageId; StageId::COUNT] = [
    StageId::Input,
    StageId::NoiseGate,
    StageId::Compressor,
    StageId::Lowpass,
    StageId::Highpass,
    StageId::Bandpass,
    StageId::Notch,
    StageId::Peaking,
    StageId::LowShelf,
    StageId::HighShelf,
    StageId::Distortion,
    StageId::BitCrusher,
    StageId::Waveshaper,
    StageId::Phaser,
    StageId::Chorus,
    StageId::PitchShift,
    StageId::Delay,
    StageId::Reverb,
    StageId::Panner,
    StageId::Limiter,
    StageId::Master,
];

/// Renderer effect type for a slot.
pub const fn renderer_type(id: StageId) -> &'static str {
    match id {
        StageId::Input | StageId::Master => "Gain",
        StageId::NoiseGate => "NoiseGate",
        StageId::Compressor => "Compressor",
        StageId::Distortion => "Distortion",
        StageId::BitCrusher => "Bitcrush",
        StageId::Waveshaper => "Clipping",
        StageId::Lowpass => "LowpassFilter",
        StageId::Highpass => "HighpassFilter",
        StageId::Bandpass => "BandpassFilter",
        StageId::Notch => "NotchFilter",
        StageId::Peaking => "PeakFilter",
        StageId::LowShelf => "LowShelfFilter",
        StageId::HighShelf => "HighShelfFilter",
        StageId::Phaser => "Phaser",
        StageId::Chorus => "Chorus",
        StageId::PitchShift => "PitchShift",
        StageId::Delay => "Delay",
        StageId::Reverb => "Reverb",
        StageId::Panner => "Pan",
        StageId::Limiter => "Limiter",
    }
}

/// Parameter names the renderer accepts for each effect type.
pub const RENDERER_SCHEMA: &[(&str, &[&str])] = &[
    ("Gain", &["gain_db"]),
    (
        "NoiseGate",
        &["threshold_db", "ratio", "attack_ms", "release_ms"],
    ),
    (
        "Compressor",
        &["threshold_db", "ratio", "attack_ms", "release_ms"],
    ),
    ("Limiter", &["threshold_db", "release_ms"]),
    ("Distortion", &["drive_db"]),
    ("Clipping", &["threshold_db"]),
    ("Bitcrush", &["bit_depth"]),
    ("LowpassFilter", &["cutoff_hz"]),
    ("HighpassFilter", &["cutoff_hz"]),
    ("BandpassFilter", &["cutoff_hz", "q"]),
    ("NotchFilter", &["cutoff_hz", "q"]),
    ("PeakFilter", &["cutoff_hz", "gain_db", "q"]),
    ("LowShelfFilter", &["cutoff_hz", "gain_db", "q"]),
    ("HighShelfFilter", &["cutoff_hz", "gain_db", "q"]),
    (
        "Phaser",
        &["rate_hz", "depth", "centre_frequency_hz", "feedback", "mix"],
    ),
    (
        "Chorus",
        &["rate_hz", "depth", "centre_delay_ms", "feedback", "mix"],
    ),
    ("PitchShift", &["semitones"]),
    ("Delay", &["delay_seconds", "feedback", "mix"]),
    (
        "Reverb",
        &["room_size", "damping", "wet_level", "dry_level", "width"],
    ),
    ("Pan", &["pan"]),
    ("LadderFilter", &["cutoff_hz", "resonance", "drive"]),
    ("Invert", &[]),
    ("Resample", &["target_sample_rate"]),
];

/// Parameter names accepted for a renderer effect type.
pub fn renderer_params(effect_type: &str) -> Option<&'static [&'static str]> {
    RENDERER_SCHEMA
        .iter()
        .find(|(name, _)| *name == effect_type)
        .map(|(_, params)| *params)
}

/// A documented lossy mapping between a stage and its renderer equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Approximation {
    /// Slot whose export is approximate.
    pub stage: StageId,
    /// What is lost.
    pub description: &'static str,
}

const APPROXIMATIONS: &[Approximation] = &[
    Approximation {
        stage: StageId::Distortion,
        description: "drive_db = distortion x 20; the renderer's drive curve differs",
    },
    Approximation {
        stage: StageId::Waveshaper,
        description: "Chebyshev order rendered as a hard clip at -20*log10(order) dB",
    },
    Approximation {
        stage: StageId::Phaser,
        description: "octaves mapped to depth = octaves / 8; feedback fixed at 0",
    },
    Approximation {
        stage: StageId::Chorus,
        description: "delay_time used as the centre delay; feedback fixed at 0",
    },
    Approximation {
        stage: StageId::Reverb,
        description: "decay and pre-delay are not exported; room_size fixed at 0.5",
    },
];

/// Every approximate mapping the serializer can apply.
pub fn approximations() -> &'static [Approximation] {
    APPROXIMATIONS
}

/// Approximations that affect the current state (their stage is active).
pub fn applied_approximations(registry: &NodeRegistry) -> Vec<&'static Approximation> {
    APPROXIMATIONS
        .iter()
        .filter(|a| is_active(registry.stage(a.stage)))
        .collect()
}

/// One exported effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectEntry {
    /// Renderer effect type (`"Compressor"`, `"LowpassFilter"`, ...).
    #[serde(rename = "type", alias = "name")]
    pub effect_type: String,

    /// Parameters in renderer units.
    #[serde(default)]
    pub params: BTreeMap<String, f64>,

    /// Region start in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,

    /// Region end in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

impl EffectEntry {
    /// Create an entry with no parameters.
    pub fn new(effect_type: impl Into<String>) -> Self {
        Self {
            effect_type: effect_type.into(),
            params: BTreeMap::new(),
            start_time: None,
            end_time: None,
        }
    }

    /// Adds a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Restricts the entry to a region, in seconds.
    pub fn with_region(mut self, start_time: Option<f64>, end_time: Option<f64>) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    /// Reads a parameter.
    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.get(name).copied()
    }
}

/// Ordered list of active effects handed to the offline renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectChainDescriptor {
    entries: Vec<EffectEntry>,
}

impl EffectChainDescriptor {
    /// Wraps a list of entries.
    pub fn new(entries: Vec<EffectEntry>) -> Self {
        Self { entries }
    }

    /// Entries in chain order.
    pub fn entries(&self) -> &[EffectEntry] {
        &self.entries
    }

    /// Iterates entries in chain order.
    pub fn iter(&self) -> std::slice::Iter<'_, EffectEntry> {
        self.entries.iter()
    }

    /// Effect types in chain order.
    pub fn types(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.effect_type.as_str()).collect()
    }

    /// First entry of a renderer type.
    pub fn find(&self, effect_type: &str) -> Option<&EffectEntry> {
        self.entries.iter().find(|e| e.effect_type == effect_type)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no stage is active.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Applies the same region to every entry.
    pub fn with_region(self, start_time: Option<f64>, end_time: Option<f64>) -> Self {
        Self {
            entries: self
                .entries
                .into_iter()
                .map(|e| e.with_region(start_time, end_time))
                .collect(),
        }
    }

    /// Serializes to compact JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serializes to indented JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a descriptor from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl IntoIterator for EffectChainDescriptor {
    type Item = EffectEntry;
    type IntoIter = std::vec::IntoIter<EffectEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a EffectChainDescriptor {
    type Item = &'a EffectEntry;
    type IntoIter = std::slice::Iter<'a, EffectEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds the descriptor for the registry's current state.
///
/// Pure: the same registry state always yields the same descriptor.
pub fn export(registry: &NodeRegistry) -> EffectChainDescriptor {
    let entries = EXPORT_ORDER
        .iter()
        .map(|id| registry.stage(*id))
        .filter_map(export_stage)
        .collect();
    EffectChainDescriptor { entries }
}

/// Converts one stage to its renderer entry, or `None` if it is inactive.
pub fn export_stage(stage: &Stage) -> Option<EffectEntry> {
    if !is_active(stage) {
        return None;
    }
    let v = |name: &str| stage.value(name);
    let entry = EffectEntry::new(renderer_type(stage.id()));

    let entry = match stage.id() {
        StageId::Input | StageId::Master => entry.with_param("gain_db", linear_to_db(v("gain"))),
        StageId::NoiseGate | StageId::Compressor => entry
            .with_param("threshold_db", v("threshold"))
            .with_param("ratio", v("ratio"))
            .with_param("attack_ms", seconds_to_ms(v("attack")))
            .with_param("release_ms", seconds_to_ms(v("release"))),
        StageId::Limiter => entry
            .with_param("threshold_db", v("threshold"))
            .with_param("release_ms", seconds_to_ms(v("release"))),
        StageId::Distortion => {
            entry.with_param("drive_db", v("distortion") * DISTORTION_DRIVE_DB_SCALE)
        }
        StageId::BitCrusher => entry.with_param("bit_depth", v("bits")),
        StageId::Waveshaper => entry.with_param("threshold_db", -linear_to_db(v("order"))),
        StageId::Lowpass | StageId::Highpass => entry.with_param("cutoff_hz", v("frequency")),
        StageId::Bandpass | StageId::Notch => entry
            .with_param("cutoff_hz", v("frequency"))
            .with_param("q", v("q")),
        StageId::Peaking | StageId::LowShelf | StageId::HighShelf => entry
            .with_param("cutoff_hz", v("frequency"))
            .with_param("gain_db", v("gain"))
            .with_param("q", v("q")),
        StageId::Phaser => entry
            .with_param("rate_hz", v("frequency"))
            .with_param("depth", v("octaves") / PHASER_MAX_OCTAVES)
            .with_param("centre_frequency_hz", v("base_frequency"))
            .with_param("feedback", MODULATION_FEEDBACK)
            .with_param("mix", v("wet")),
        StageId::Chorus => entry
            .with_param("rate_hz", v("frequency"))
            .with_param("depth", v("depth"))
            .with_param("centre_delay_ms", v("delay_time"))
            .with_param("feedback", MODULATION_FEEDBACK)
            .with_param("mix", v("wet")),
        StageId::PitchShift => entry.with_param("semitones", v("pitch")),
        StageId::Delay => entry
            .with_param("delay_seconds", v("delay_time"))
            .with_param("feedback", v("feedback"))
            .with_param("mix", v("wet")),
        StageId::Reverb => entry
            .with_param("room_size", REVERB_ROOM_SIZE)
            .with_param("wet_level", v("wet"))
            .with_param("dry_level", 1.0 - v("wet")),
        StageId::Panner => entry.with_param("pan", v("pan")),
    };
    Some(entry)
}
