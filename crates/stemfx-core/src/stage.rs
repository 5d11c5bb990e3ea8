//! Stage kinds and graph slots.
//!
//! A [`StageKind`] is the type of processing a stage performs (a lowpass
//! filter, a reverb, ...). A [`StageId`] is one of the fixed positions in the
//! signal graph. Every slot has exactly one kind; the input trim and the master
//! output are both [`StageKind::Gain`] but occupy different slots.
//!
//! [`StageId::SIGNAL_ORDER`] is the one serial routing the engine builds:
//!
//! ```text
//! input → gate → comp → dist → crush → shaper → LP → HP → BP → notch → peak
//!       → low shelf → high shelf → phaser → chorus → pitch → delay → reverb
//!       → pan → limiter → master
//! ```

use core::fmt;
use core::str::FromStr;

/// The closed palette of processing building blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
    /// Linear gain stage.
    Gain,
    /// Downward compressor.
    Compressor,
    /// Brickwall limiter.
    Limiter,
    /// Noise gate.
    NoiseGate,
    /// Lowpass filter.
    LowpassFilter,
    /// Highpass filter.
    HighpassFilter,
    /// Bandpass filter.
    BandpassFilter,
    /// Notch filter.
    NotchFilter,
    /// Peaking EQ band.
    PeakingFilter,
    /// Low shelf EQ band.
    LowShelfFilter,
    /// High shelf EQ band.
    HighShelfFilter,
    /// Modulated-delay chorus.
    Chorus,
    /// Allpass phaser.
    Phaser,
    /// Waveshaping distortion.
    Distortion,
    /// Bit depth reduction.
    BitCrusher,
    /// Chebyshev polynomial waveshaper.
    WaveshaperDrive,
    /// Feedback delay line.
    FeedbackDelay,
    /// Algorithmic reverb.
    Reverb,
    /// Pitch shifter (fixed tempo).
    PitchShift,
    /// Equal-power stereo panner.
    StereoPanner,
}

impl StageKind {
    /// Returns the category used for grouping in listings.
    pub const fn category(&self) -> StageCategory {
        match self {
            StageKind::Compressor | StageKind::Limiter | StageKind::NoiseGate => {
                StageCategory::Dynamics
            }
            StageKind::Distortion | StageKind::BitCrusher | StageKind::WaveshaperDrive => {
                StageCategory::Distortion
            }
            StageKind::LowpassFilter
            | StageKind::HighpassFilter
            | StageKind::BandpassFilter
            | StageKind::NotchFilter
            | StageKind::PeakingFilter
            | StageKind::LowShelfFilter
            | StageKind::HighShelfFilter => StageCategory::Filter,
            StageKind::Chorus | StageKind::Phaser | StageKind::PitchShift => {
                StageCategory::Modulation
            }
            StageKind::FeedbackDelay | StageKind::Reverb => StageCategory::TimeBased,
            StageKind::Gain | StageKind::StereoPanner => StageCategory::Utility,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Category of stage for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageCategory {
    /// Dynamics processing (compressor, limiter, gate)
    Dynamics,
    /// Distortion and waveshaping
    Distortion,
    /// Spectral shaping filters and EQ bands
    Filter,
    /// Modulation effects (chorus, phaser, pitch)
    Modulation,
    /// Time-based effects (delay, reverb)
    TimeBased,
    /// Gain stages and panning
    Utility,
}

impl StageCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            StageCategory::Dynamics => "Dynamics",
            StageCategory::Distortion => "Distortion",
            StageCategory::Filter => "Filter",
            StageCategory::Modulation => "Modulation",
            StageCategory::TimeBased => "Time-Based",
            StageCategory::Utility => "Utility",
        }
    }
}

/// One fixed position in the signal graph.
///
/// The registry holds exactly one stage per slot, so iterating
/// [`StageId::ALL`] touches every stage the engine owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageId {
    /// Input trim, the point the transport (or stretch node) feeds.
    Input,
    /// Noise gate.
    NoiseGate,
    /// Compressor.
    Compressor,
    /// Distortion.
    Distortion,
    /// Bit reduction.
    BitCrusher,
    /// Chebyshev waveshaper drive.
    Waveshaper,
    /// Lowpass filter.
    Lowpass,
    /// Highpass filter.
    Highpass,
    /// Bandpass filter.
    Bandpass,
    /// Notch filter.
    Notch,
    /// Peaking EQ band.
    Peaking,
    /// Low shelf.
    LowShelf,
    /// High shelf.
    HighShelf,
    /// Phaser.
    Phaser,
    /// Chorus.
    Chorus,
    /// Pitch shifter.
    PitchShift,
    /// Feedback delay.
    Delay,
    /// Reverb.
    Reverb,
    /// Stereo panner.
    Panner,
    /// Limiter, catches summed peaks before the master stage.
    Limiter,
    /// Master output gain, the terminal stage.
    Master,
}

impl StageId {
    /// Number of slots in the graph.
    pub const COUNT: usize = 21;

    /// Fixed serial routing from input to master output.
    ///
    /// Dynamics and distortion run before spectral shaping, modulation before
    /// time-based effects, and the limiter last. Reordering changes the sound.
    pub const SIGNAL_ORDER: [StageId; Self::COUNT] = [
        StageId::Input,
        StageId::NoiseGate,
        StageId::Compressor,
        StageId::Distortion,
        StageId::BitCrusher,
        StageId::Waveshaper,
        StageId::Lowpass,
        StageId::Highpass,
        StageId::Bandpass,
        StageId::Notch,
        StageId::Peaking,
        StageId::LowShelf,
        StageId::HighShelf,
        StageId::Phaser,
        StageId::Chorus,
        StageId::PitchShift,
        StageId::Delay,
        StageId::Reverb,
        StageId::Panner,
        StageId::Limiter,
        StageId::Master,
    ];

    /// All slots, in signal order.
    pub const ALL: [StageId; Self::COUNT] = Self::SIGNAL_ORDER;

    /// The processing kind occupying this slot.
    pub const fn kind(&self) -> StageKind {
        match self {
            StageId::Input | StageId::Master => StageKind::Gain,
            StageId::NoiseGate => StageKind::NoiseGate,
            StageId::Compressor => StageKind::Compressor,
            StageId::Distortion => StageKind::Distortion,
            StageId::BitCrusher => StageKind::BitCrusher,
            StageId::Waveshaper => StageKind::WaveshaperDrive,
            StageId::Lowpass => StageKind::LowpassFilter,
            StageId::Highpass => StageKind::HighpassFilter,
            StageId::Bandpass => StageKind::BandpassFilter,
            StageId::Notch => StageKind::NotchFilter,
            StageId::Peaking => StageKind::PeakingFilter,
            StageId::LowShelf => StageKind::LowShelfFilter,
            StageId::HighShelf => StageKind::HighShelfFilter,
            StageId::Phaser => StageKind::Phaser,
            StageId::Chorus => StageKind::Chorus,
            StageId::PitchShift => StageKind::PitchShift,
            StageId::Delay => StageKind::FeedbackDelay,
            StageId::Reverb => StageKind::Reverb,
            StageId::Panner => StageKind::StereoPanner,
            StageId::Limiter => StageKind::Limiter,
        }
    }

    /// Stable lowercase identifier used in session files and on the CLI.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StageId::Input => "input",
            StageId::NoiseGate => "noise_gate",
            StageId::Compressor => "compressor",
            StageId::Distortion => "distortion",
            StageId::BitCrusher => "bit_crusher",
            StageId::Waveshaper => "waveshaper",
            StageId::Lowpass => "lowpass",
            StageId::Highpass => "highpass",
            StageId::Bandpass => "bandpass",
            StageId::Notch => "notch",
            StageId::Peaking => "peaking",
            StageId::LowShelf => "low_shelf",
            StageId::HighShelf => "high_shelf",
            StageId::Phaser => "phaser",
            StageId::Chorus => "chorus",
            StageId::PitchShift => "pitch_shift",
            StageId::Delay => "delay",
            StageId::Reverb => "reverb",
            StageId::Panner => "panner",
            StageId::Limiter => "limiter",
            StageId::Master => "master",
        }
    }

    /// Position of this slot in [`SIGNAL_ORDER`](Self::SIGNAL_ORDER).
    pub fn signal_index(&self) -> usize {
        // SIGNAL_ORDER lists every variant exactly once.
        Self::SIGNAL_ORDER
            .iter()
            .position(|id| id == self)
            .unwrap_or(Self::COUNT)
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no stage slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stage: {0}")]
pub struct UnknownStage(pub String);

impl FromStr for StageId {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        StageId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}
