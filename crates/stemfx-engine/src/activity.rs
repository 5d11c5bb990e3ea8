//! Bypass/activity inference.
//!
//! Every stage always processes audio, so "bypassed" is a judgment made from
//! parameter values alone: a stage is active when the parameter that defines
//! its effect has moved off its neutral value. The rules are a fixed table
//! keyed by slot, evaluated only when exporting.
//!
//! | Slot | Active iff |
//! |---|---|
//! | Input, Master | `gain != 1` |
//! | NoiseGate | `threshold > -100` |
//! | Compressor, Limiter | `threshold < 0` |
//! | Distortion | `distortion > 0` |
//! | BitCrusher | `bits < 16` |
//! | Waveshaper | `order > 1` |
//! | Filters and EQ bands | `frequency != default` |
//! | Phaser, Chorus, Delay, Reverb | `wet > 0` |
//! | PitchShift | `pitch != 0` |
//! | Panner | `pan != 0` |

use stemfx_core::StageId;
use stemfx_registry::{NodeRegistry, Stage};

/// Unity linear gain.
pub const UNITY_GAIN: f64 = 1.0;

/// Gate threshold at which nothing is gated.
pub const GATE_OPEN_THRESHOLD_DB: f64 = -100.0;

/// Full bit depth; no reduction.
pub const FULL_BIT_DEPTH: f64 = 16.0;

/// Returns `true` if the stage contributes audibly and belongs in an export.
pub fn is_active(stage: &Stage) -> bool {
    match stage.id() {
        StageId::Input | StageId::Master => stage.value("gain") != UNITY_GAIN,
        StageId::NoiseGate => stage.value("threshold") > GATE_OPEN_THRESHOLD_DB,
        StageId::Compressor | StageId::Limiter => stage.value("threshold") < 0.0,
        StageId::Distortion => stage.value("distortion") > 0.0,
        StageId::BitCrusher => stage.value("bits") < FULL_BIT_DEPTH,
        StageId::Waveshaper => stage.value("order") > 1.0,
        StageId::Lowpass
        | StageId::Highpass
        | StageId::Bandpass
        | StageId::Notch
        | StageId::Peaking
        | StageId::LowShelf
        | StageId::HighShelf => frequency_moved(stage),
        StageId::Phaser | StageId::Chorus | StageId::Delay | StageId::Reverb => {
            stage.value("wet") > 0.0
        }
        StageId::PitchShift => stage.value("pitch") != 0.0,
        StageId::Panner => stage.value("pan") != 0.0,
    }
}

fn frequency_moved(stage: &Stage) -> bool {
    stage
        .descriptor()
        .param("frequency")
        .is_some_and(|desc| !desc.is_default(stage.value("frequency")))
}

/// Slots whose stages are currently active, in signal order.
pub fn active_stages(registry: &NodeRegistry) -> Vec<StageId> {
    registry
        .iter()
        .filter(|stage| is_active(stage))
        .map(Stage::id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parameter that drives each slot's activity rule, with one active value.
    const DRIVERS: [(StageId, &str, f64); StageId::COUNT] = [
        (StageId::Input, "gain", 2.0),
        (StageId::NoiseGate, "threshold", -40.0),
        (StageId::Compressor, "threshold", -24.0),
        (StageId::Distortion, "distortion", 0.3),
        (StageId::BitCrusher, "bits", 4.0),
        (StageId::Waveshaper, "order", 50.0),
        (StageId::Lowpass, "frequency", 5000.0),
        (StageId::Highpass, "frequency", 120.0),
        (StageId::Bandpass, "frequency", 800.0),
        (StageId::Notch, "frequency", 60.0),
        (StageId::Peaking, "frequency", 3000.0),
        (StageId::LowShelf, "frequency", 150.0),
        (StageId::HighShelf, "frequency", 8000.0),
        (StageId::Phaser, "wet", 0.5),
        (StageId::Chorus, "wet", 0.5),
        (StageId::PitchShift, "pitch", -3.0),
        (StageId::Delay, "wet", 0.3),
        (StageId::Reverb, "wet", 0.4),
        (StageId::Panner, "pan", -0.5),
        (StageId::Limiter, "threshold", -1.0),
        (StageId::Master, "gain", 0.5),
    ];

    #[test]
    fn test_neutral_defaults_are_inactive() {
        let registry = NodeRegistry::new();
        for stage in registry.iter() {
            assert!(!is_active(stage), "{} active at defaults", stage.id());
        }
        assert!(active_stages(&registry).is_empty());
    }

    #[test]
    fn test_moving_the_driver_activates() {
        for (id, name, value) in DRIVERS {
            let mut stage = Stage::new(id);
            stage.set(name, value).unwrap();
            assert!(is_active(&stage), "{id}.{name}={value} should be active");
        }
    }

    #[test]
    fn test_exactly_at_default_is_inactive() {
        for (id, name, value) in DRIVERS {
            let mut stage = Stage::new(id);
            stage.set(name, value).unwrap();
            let default = stage.descriptor().param(name).unwrap().default;
            stage.set(name, default).unwrap();
            assert!(!is_active(&stage), "{id}.{name} back at default should be inactive");
        }
    }

    #[test]
    fn test_non_driver_params_do_not_activate() {
        let mut stage = Stage::new(StageId::Reverb);
        stage.set("decay", 6.0).unwrap();
        assert!(!is_active(&stage));

        let mut stage = Stage::new(StageId::Compressor);
        stage.set("ratio", 4.0).unwrap();
        assert!(!is_active(&stage));

        // EQ gain alone leaves the band at its neutral centre frequency.
        let mut stage = Stage::new(StageId::Peaking);
        stage.set("gain", 6.0).unwrap();
        assert!(!is_active(&stage));
    }

    #[test]
    fn test_lowpass_slightly_below_top_is_active() {
        let mut stage = Stage::new(StageId::Lowpass);
        stage.set("frequency", 19999.0).unwrap();
        assert!(is_active(&stage));
    }

    #[test]
    fn test_active_stages_in_signal_order() {
        let mut registry = NodeRegistry::new();
        registry.set(StageId::Reverb, "wet", 0.4).unwrap();
        registry.set(StageId::Input, "gain", 0.8).unwrap();
        registry.set(StageId::Lowpass, "frequency", 5000.0).unwrap();
        assert_eq!(
            active_stages(&registry),
            vec![StageId::Input, StageId::Lowpass, StageId::Reverb]
        );
    }
}
