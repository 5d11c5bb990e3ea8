//! Static stage descriptor tables.
//!
//! Each slot's parameters are listed in the runtime's units with the neutral
//! default the stage is created with. A stage left at these defaults is
//! audibly transparent and is omitted from exports.

use stemfx_core::{ParamDescriptor, ParamUnit, StageCategory, StageId, StageKind};

/// Describes one slot of the signal graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageDescriptor {
    /// Slot this descriptor belongs to.
    pub id: StageId,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the stage.
    pub description: &'static str,
    /// Parameter table, in the order the runtime node is created with.
    pub params: &'static [ParamDescriptor],
}

impl StageDescriptor {
    /// Processing kind of the slot.
    pub const fn kind(&self) -> StageKind {
        self.id.kind()
    }

    /// Category for organization.
    pub const fn category(&self) -> StageCategory {
        self.id.kind().category()
    }

    /// Looks up a parameter by name, ignoring ASCII case.
    pub fn param(&self, name: &str) -> Option<&'static ParamDescriptor> {
        self.params
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Index of a parameter by name, ignoring ASCII case.
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
    }
}

const GAIN_PARAMS: &[ParamDescriptor] = &[ParamDescriptor::linear_gain("gain", 1.0)];

const NOISE_GATE_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::gain_db("threshold", -100.0, 0.0, -100.0),
    ParamDescriptor::new("ratio", ParamUnit::Ratio, 1.0, 100.0, 10.0),
    ParamDescriptor::seconds("attack", 0.0, 1.0, 0.001),
    ParamDescriptor::seconds("release", 0.0, 5.0, 0.1),
];

const COMPRESSOR_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::gain_db("threshold", -100.0, 0.0, 0.0),
    ParamDescriptor::new("ratio", ParamUnit::Ratio, 1.0, 20.0, 12.0),
    ParamDescriptor::seconds("attack", 0.0, 1.0, 0.003),
    ParamDescriptor::seconds("release", 0.0, 1.0, 0.25),
];

const DISTORTION_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::new("distortion", ParamUnit::None, 0.0, 1.0, 0.0),
    ParamDescriptor::wet(0.0),
];

const BIT_CRUSHER_PARAMS: &[ParamDescriptor] =
    &[ParamDescriptor::new("bits", ParamUnit::Bits, 1.0, 16.0, 16.0)];

const WAVESHAPER_PARAMS: &[ParamDescriptor] =
    &[ParamDescriptor::new("order", ParamUnit::Order, 1.0, 100.0, 1.0)];

const LOWPASS_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::frequency("frequency", 0.0, 20000.0, 20000.0),
    ParamDescriptor::q(1.0),
];

const HIGHPASS_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::frequency("frequency", 0.0, 20000.0, 0.0),
    ParamDescriptor::q(1.0),
];

const BANDPASS_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::frequency("frequency", 0.0, 20000.0, 1000.0),
    ParamDescriptor::q(1.0),
];

const NOTCH_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::frequency("frequency", 0.0, 20000.0, 1000.0),
    ParamDescriptor::q(1.0),
];

const PEAKING_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::frequency("frequency", 0.0, 20000.0, 1000.0),
    ParamDescriptor::gain_db("gain", -40.0, 40.0, 0.0),
    ParamDescriptor::q(1.0),
];

const LOW_SHELF_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::frequency("frequency", 0.0, 20000.0, 200.0),
    ParamDescriptor::gain_db("gain", -40.0, 40.0, 0.0),
    ParamDescriptor::q(1.0),
];

const HIGH_SHELF_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::frequency("frequency", 0.0, 20000.0, 2000.0),
    ParamDescriptor::gain_db("gain", -40.0, 40.0, 0.0),
    ParamDescriptor::q(1.0),
];

const PHASER_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::frequency("frequency", 0.0, 20.0, 15.0),
    ParamDescriptor::new("octaves", ParamUnit::Octaves, 0.0, 8.0, 5.0),
    ParamDescriptor::frequency("base_frequency", 0.0, 20000.0, 1000.0),
    ParamDescriptor::wet(0.0),
];

const CHORUS_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::frequency("frequency", 0.0, 20.0, 4.0),
    ParamDescriptor::new("delay_time", ParamUnit::Milliseconds, 2.0, 20.0, 2.5),
    ParamDescriptor::new("depth", ParamUnit::None, 0.0, 1.0, 0.5),
    ParamDescriptor::wet(0.0),
];

const PITCH_SHIFT_PARAMS: &[ParamDescriptor] = &[ParamDescriptor::new(
    "pitch",
    ParamUnit::Semitones,
    -24.0,
    24.0,
    0.0,
)];

// delay_time default is an eighth note at 120 BPM.
const DELAY_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::seconds("delay_time", 0.0, 4.0, 0.25),
    ParamDescriptor::new("feedback", ParamUnit::None, 0.0, 0.95, 0.0),
    ParamDescriptor::wet(0.0),
];

const REVERB_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::seconds("decay", 0.001, 20.0, 1.5),
    ParamDescriptor::seconds("pre_delay", 0.0, 1.0, 0.01),
    ParamDescriptor::wet(0.0),
];

const PANNER_PARAMS: &[ParamDescriptor] =
    &[ParamDescriptor::new("pan", ParamUnit::None, -1.0, 1.0, 0.0)];

const LIMITER_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::gain_db("threshold", -100.0, 0.0, 0.0),
    ParamDescriptor::seconds("release", 0.0, 1.0, 0.1),
];

/// Descriptor table for every slot, in signal order.
pub static STAGES: [StageDescriptor; StageId::COUNT] = [
    StageDescriptor {
        id: StageId::Input,
        name: "Input",
        description: "Input trim fed by the transport or stretch node",
        params: GAIN_PARAMS,
    },
    StageDescriptor {
        id: StageId::NoiseGate,
        name: "Noise Gate",
        description: "Mutes the signal below a threshold",
        params: NOISE_GATE_PARAMS,
    },
    StageDescriptor {
        id: StageId::Compressor,
        name: "Compressor",
        description: "Downward compressor",
        params: COMPRESSOR_PARAMS,
    },
    StageDescriptor {
        id: StageId::Distortion,
        name: "Distortion",
        description: "Waveshaping distortion",
        params: DISTORTION_PARAMS,
    },
    StageDescriptor {
        id: StageId::BitCrusher,
        name: "Bit Crusher",
        description: "Bit depth reduction",
        params: BIT_CRUSHER_PARAMS,
    },
    StageDescriptor {
        id: StageId::Waveshaper,
        name: "Waveshaper",
        description: "Chebyshev polynomial drive",
        params: WAVESHAPER_PARAMS,
    },
    StageDescriptor {
        id: StageId::Lowpass,
        name: "Lowpass",
        description: "Lowpass filter, open at the top of the audible range",
        params: LOWPASS_PARAMS,
    },
    StageDescriptor {
        id: StageId::Highpass,
        name: "Highpass",
        description: "Highpass filter, open at the bottom of the audible range",
        params: HIGHPASS_PARAMS,
    },
    StageDescriptor {
        id: StageId::Bandpass,
        name: "Bandpass",
        description: "Bandpass filter",
        params: BANDPASS_PARAMS,
    },
    StageDescriptor {
        id: StageId::Notch,
        name: "Notch",
        description: "Notch filter",
        params: NOTCH_PARAMS,
    },
    StageDescriptor {
        id: StageId::Peaking,
        name: "Peaking EQ",
        description: "Peaking EQ band",
        params: PEAKING_PARAMS,
    },
    StageDescriptor {
        id: StageId::LowShelf,
        name: "Low Shelf",
        description: "Low shelf EQ band",
        params: LOW_SHELF_PARAMS,
    },
    StageDescriptor {
        id: StageId::HighShelf,
        name: "High Shelf",
        description: "High shelf EQ band",
        params: HIGH_SHELF_PARAMS,
    },
    StageDescriptor {
        id: StageId::Phaser,
        name: "Phaser",
        description: "LFO-swept allpass phaser",
        params: PHASER_PARAMS,
    },
    StageDescriptor {
        id: StageId::Chorus,
        name: "Chorus",
        description: "Modulated delay chorus",
        params: CHORUS_PARAMS,
    },
    StageDescriptor {
        id: StageId::PitchShift,
        name: "Pitch Shift",
        description: "Pitch shifter in semitones",
        params: PITCH_SHIFT_PARAMS,
    },
    StageDescriptor {
        id: StageId::Delay,
        name: "Delay",
        description: "Feedback delay with tempo-synced time",
        params: DELAY_PARAMS,
    },
    StageDescriptor {
        id: StageId::Reverb,
        name: "Reverb",
        description: "Algorithmic reverb",
        params: REVERB_PARAMS,
    },
    StageDescriptor {
        id: StageId::Panner,
        name: "Panner",
        description: "Equal-power stereo panner",
        params: PANNER_PARAMS,
    },
    StageDescriptor {
        id: StageId::Limiter,
        name: "Limiter",
        description: "Brickwall limiter catching summed peaks",
        params: LIMITER_PARAMS,
    },
    StageDescriptor {
        id: StageId::Master,
        name: "Master",
        description: "Master output gain",
        params: GAIN_PARAMS,
    },
];

/// Returns the static descriptor for a slot.
pub fn descriptor(id: StageId) -> &'static StageDescriptor {
    // STAGES is laid out in signal order.
    &STAGES[id.signal_index()]
}
