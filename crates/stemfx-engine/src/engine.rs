//! The effect-chain engine and its parameter control surface.
//!
//! [`AudioEngine`] owns the node registry, the fixed signal graph, and the
//! runtime driving it. Setters write through the registry (the state exports
//! read from) to the runtime node in one step; none of them changes topology.
//!
//! Setters take runtime units: linear gain, seconds for envelope times and
//! delay, Hz for frequencies. [`export`](AudioEngine::export) converts to the
//! renderer's units.

use serde::{Deserialize, Serialize};
use stemfx_core::{AudioRuntime, DelayTime, NodeHandle, ParamDescriptor, StageId};
use stemfx_registry::NodeRegistry;

use crate::error::{EngineError, EngineWarning};
use crate::export::{self, Approximation, EffectChainDescriptor};
use crate::graph::SignalGraph;
use crate::time_stretch::{TimeStretch, TimeStretchOptions, TimeStretchState};

/// Tempo the engine starts at.
pub const DEFAULT_BPM: f64 = 120.0;

/// What to do with finite values outside a parameter's documented range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    /// Clamp to the range and warn.
    #[default]
    Clamp,
    /// Write the value unchanged and warn; the runtime may clamp it.
    PassThrough,
}

/// Engine construction options.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Tempo used to resolve note-valued delay times.
    pub bpm: f64,
    /// Range policy for setters.
    pub out_of_range: OutOfRangePolicy,
    /// Time-stretch extension settings.
    pub time_stretch: TimeStretchOptions,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            out_of_range: OutOfRangePolicy::default(),
            time_stretch: TimeStretchOptions::default(),
        }
    }
}

/// Effect-chain engine over an audio-node runtime.
///
/// # Example
///
/// ```rust
/// use stemfx_engine::{AudioEngine, EngineOptions, HeadlessRuntime};
///
/// let mut engine = AudioEngine::new(HeadlessRuntime::new(), EngineOptions::default()).unwrap();
/// engine.set_lowpass(5000.0);
/// engine.set_distortion(0.3);
///
/// let descriptor = engine.export();
/// assert_eq!(descriptor.types(), vec!["LowpassFilter", "Distortion"]);
/// ```
pub struct AudioEngine<R: AudioRuntime> {
    pub(crate) runtime: R,
    pub(crate) registry: NodeRegistry,
    pub(crate) graph: SignalGraph,
    pub(crate) options: EngineOptions,
    pub(crate) delay_time: DelayTime,
    pub(crate) source: Option<NodeHandle>,
    pub(crate) time_stretch: TimeStretch,
    pub(crate) warnings: Vec<EngineWarning>,
}

impl<R: AudioRuntime> AudioEngine<R> {
    /// Creates every stage with neutral defaults and wires the fixed graph.
    ///
    /// # Errors
    ///
    /// Fails only if the runtime cannot create or connect a node.
    pub fn new(mut runtime: R, options: EngineOptions) -> Result<Self, EngineError> {
        let registry = NodeRegistry::new();
        let graph = SignalGraph::build(&mut runtime, &registry)?;
        let mut engine = Self {
            runtime,
            registry,
            graph,
            options: EngineOptions {
                bpm: DEFAULT_BPM,
                ..options.clone()
            },
            delay_time: DelayTime::default(),
            source: None,
            time_stretch: TimeStretch::Unavailable,
            warnings: Vec::new(),
        };
        if options.bpm != DEFAULT_BPM {
            engine.set_bpm(options.bpm);
        }
        tracing::info!(
            stages = StageId::COUNT,
            bpm = engine.options.bpm,
            "audio engine constructed"
        );
        Ok(engine)
    }

    /// Loads the source and connects it to the graph.
    ///
    /// The source feeds the stretch node if time-stretch is ready, otherwise
    /// the input stage. A previously loaded source is stopped and detached
    /// once the new one is connected.
    ///
    /// # Errors
    ///
    /// Returns the runtime's error if the source cannot be loaded or connected.
    pub async fn initialize(&mut self, locator: &str) -> Result<(), EngineError> {
        let source = self.runtime.load_source(locator).await?;
        let target = match self.time_stretch {
            TimeStretch::Ready { node } => node,
            _ => self.graph.input(),
        };
        // A failed connect keeps the previous source playing.
        self.runtime.connect(source, target)?;
        if let Some(previous) = self.source.replace(source) {
            self.runtime.stop(previous)?;
            self.runtime.disconnect(previous)?;
        }
        tracing::info!(locator, %source, "source loaded");
        Ok(())
    }

    /// Starts playback of the loaded source.
    pub fn play(&mut self) -> Result<(), EngineError> {
        match self.source {
            Some(source) => Ok(self.runtime.start(source)?),
            None => {
                self.warn(EngineWarning::NoSource { action: "play" });
                Ok(())
            }
        }
    }

    /// Stops playback of the loaded source.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        match self.source {
            Some(source) => Ok(self.runtime.stop(source)?),
            None => {
                self.warn(EngineWarning::NoSource { action: "stop" });
                Ok(())
            }
        }
    }

    // --- Gain ---

    /// Input trim, linear (1.0 = unity).
    pub fn set_input_gain(&mut self, gain: f64) {
        self.set_known(StageId::Input, "gain", gain);
    }

    /// Master output gain, linear (1.0 = unity).
    pub fn set_master_gain(&mut self, gain: f64) {
        self.set_known(StageId::Master, "gain", gain);
    }

    // --- Dynamics ---

    /// Noise gate threshold in dB; -100 leaves the gate open.
    pub fn set_noise_gate(&mut self, threshold_db: f64) {
        self.set_known(StageId::NoiseGate, "threshold", threshold_db);
    }

    /// Compressor threshold in dB (≤ 0).
    pub fn set_compressor_threshold(&mut self, threshold_db: f64) {
        self.set_known(StageId::Compressor, "threshold", threshold_db);
    }

    /// Compressor ratio (n:1).
    pub fn set_compressor_ratio(&mut self, ratio: f64) {
        self.set_known(StageId::Compressor, "ratio", ratio);
    }

    /// Compressor attack in seconds.
    pub fn set_compressor_attack(&mut self, seconds: f64) {
        self.set_known(StageId::Compressor, "attack", seconds);
    }

    /// Compressor release in seconds.
    pub fn set_compressor_release(&mut self, seconds: f64) {
        self.set_known(StageId::Compressor, "release", seconds);
    }

    /// Limiter ceiling in dB (≤ 0).
    pub fn set_limiter(&mut self, threshold_db: f64) {
        self.set_known(StageId::Limiter, "threshold", threshold_db);
    }

    // --- Drive ---

    /// Distortion amount (0–1). The stage runs fully wet whenever the amount
    /// is above zero and fully dry otherwise.
    pub fn set_distortion(&mut self, amount: f64) {
        self.set_known(StageId::Distortion, "distortion", amount);
        let wet = if self.registry.value(StageId::Distortion, "distortion") > 0.0 {
            1.0
        } else {
            0.0
        };
        self.set_known(StageId::Distortion, "wet", wet);
    }

    /// Bit depth (16 = clean).
    pub fn set_bit_depth(&mut self, bits: f64) {
        self.set_known(StageId::BitCrusher, "bits", bits);
    }

    /// Waveshaper polynomial order (1 = clean, 100 = hard clip).
    pub fn set_waveshaper_order(&mut self, order: f64) {
        self.set_known(StageId::Waveshaper, "order", order);
    }

    // --- Filters and EQ ---

    /// Lowpass cutoff in Hz; 20000 leaves it open.
    pub fn set_lowpass(&mut self, frequency: f64) {
        self.set_known(StageId::Lowpass, "frequency", frequency);
    }

    /// Highpass cutoff in Hz; 0 leaves it open.
    pub fn set_highpass(&mut self, frequency: f64) {
        self.set_known(StageId::Highpass, "frequency", frequency);
    }

    /// Bandpass centre frequency and Q.
    pub fn set_bandpass(&mut self, frequency: f64, q: f64) {
        self.set_known(StageId::Bandpass, "frequency", frequency);
        self.set_known(StageId::Bandpass, "q", q);
    }

    /// Notch centre frequency and Q.
    pub fn set_notch(&mut self, frequency: f64, q: f64) {
        self.set_known(StageId::Notch, "frequency", frequency);
        self.set_known(StageId::Notch, "q", q);
    }

    /// Peaking band frequency, gain in dB, and Q.
    pub fn set_peaking(&mut self, frequency: f64, gain_db: f64, q: f64) {
        self.set_known(StageId::Peaking, "frequency", frequency);
        self.set_known(StageId::Peaking, "gain", gain_db);
        self.set_known(StageId::Peaking, "q", q);
    }

    /// Low shelf corner frequency and gain in dB.
    pub fn set_low_shelf(&mut self, frequency: f64, gain_db: f64) {
        self.set_known(StageId::LowShelf, "frequency", frequency);
        self.set_known(StageId::LowShelf, "gain", gain_db);
    }

    /// High shelf corner frequency and gain in dB.
    pub fn set_high_shelf(&mut self, frequency: f64, gain_db: f64) {
        self.set_known(StageId::HighShelf, "frequency", frequency);
        self.set_known(StageId::HighShelf, "gain", gain_db);
    }

    // --- Modulation ---

    /// Phaser LFO rate in Hz, sweep width in octaves, and mix.
    pub fn set_phaser(&mut self, rate_hz: f64, octaves: f64, wet: f64) {
        self.set_known(StageId::Phaser, "frequency", rate_hz);
        self.set_known(StageId::Phaser, "octaves", octaves);
        self.set_known(StageId::Phaser, "wet", wet);
    }

    /// Chorus LFO rate in Hz, depth (0–1), and mix.
    pub fn set_chorus(&mut self, rate_hz: f64, depth: f64, wet: f64) {
        self.set_known(StageId::Chorus, "frequency", rate_hz);
        self.set_known(StageId::Chorus, "depth", depth);
        self.set_known(StageId::Chorus, "wet", wet);
    }

    /// Pitch shift in semitones, tempo unchanged.
    pub fn set_pitch_shift(&mut self, semitones: f64) {
        self.set_known(StageId::PitchShift, "pitch", semitones);
    }

    // --- Time and space ---

    /// Delay feedback (0–0.95) and mix.
    pub fn set_delay(&mut self, feedback: f64, wet: f64) {
        self.set_known(StageId::Delay, "feedback", feedback);
        self.set_known(StageId::Delay, "wet", wet);
    }

    /// Delay time, absolute or tempo-relative.
    ///
    /// Note values are resolved against the current tempo and re-resolved
    /// whenever [`set_bpm`](Self::set_bpm) changes it.
    pub fn set_delay_time(&mut self, time: impl Into<DelayTime>) {
        let time = time.into();
        self.delay_time = time;
        self.write_delay_seconds(time.to_seconds(self.options.bpm));
    }

    /// Reverb mix (0 = dry).
    pub fn set_reverb(&mut self, wet: f64) {
        self.set_known(StageId::Reverb, "wet", wet);
    }

    /// Reverb decay in seconds.
    pub fn set_reverb_decay(&mut self, seconds: f64) {
        self.set_known(StageId::Reverb, "decay", seconds);
    }

    /// Stereo position (-1 = left, 1 = right).
    pub fn set_pan(&mut self, pan: f64) {
        self.set_known(StageId::Panner, "pan", pan);
    }

    /// Changes the tempo and re-resolves a note-valued delay time.
    pub fn set_bpm(&mut self, bpm: f64) {
        if !bpm.is_finite() || bpm <= 0.0 {
            self.warn(EngineWarning::InvalidTempo { bpm });
            return;
        }
        self.options.bpm = bpm;
        tracing::debug!(bpm, "tempo changed");
        if let DelayTime::Note(division) = self.delay_time {
            self.write_delay_seconds(division.to_seconds(bpm));
        }
    }

    /// Sets any stage parameter by name.
    ///
    /// Writing the delay stage's `delay_time` this way fixes it in seconds,
    /// detaching it from the tempo.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Registry`] if the stage has no such parameter.
    /// Range problems are warnings, not errors.
    pub fn set_param(&mut self, stage: StageId, name: &str, value: f64) -> Result<(), EngineError> {
        let desc = self.registry.param_descriptor(stage, name)?;
        if stage == StageId::Delay && desc.name == "delay_time" {
            self.delay_time = DelayTime::Seconds(value);
        }
        self.write(stage, desc, value);
        Ok(())
    }

    /// Current value of a stage parameter, from the registry.
    pub fn param(&self, stage: StageId, name: &str) -> Result<f64, EngineError> {
        Ok(self.registry.get(stage, name)?)
    }

    /// Snapshot of the active stages in renderer units.
    pub fn export(&self) -> EffectChainDescriptor {
        export::export(&self.registry)
    }

    /// Snapshot restricted to a region of the source, in seconds.
    pub fn export_region(&self, start_time: Option<f64>, end_time: Option<f64>) -> EffectChainDescriptor {
        self.export().with_region(start_time, end_time)
    }

    /// Approximate mappings that apply to the current state.
    pub fn applied_approximations(&self) -> Vec<&'static Approximation> {
        export::applied_approximations(&self.registry)
    }

    /// Restores every stage to its neutral defaults.
    pub fn reset(&mut self) {
        self.delay_time = DelayTime::default();
        let bpm = self.options.bpm;
        for id in StageId::SIGNAL_ORDER {
            for (desc, _) in self.registry.stage(id).params().collect::<Vec<_>>() {
                let value = if id == StageId::Delay && desc.name == "delay_time" {
                    self.delay_time.to_seconds(bpm)
                } else {
                    desc.default
                };
                self.write(id, desc, value);
            }
        }
    }

    // --- Accessors ---

    /// Stage parameter state.
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Runtime nodes of the signal graph.
    pub fn graph(&self) -> &SignalGraph {
        &self.graph
    }

    /// The runtime driving the graph.
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// The runtime driving the graph, mutably.
    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    /// Loaded source, if any.
    pub fn source(&self) -> Option<NodeHandle> {
        self.source
    }

    /// Current tempo.
    pub fn bpm(&self) -> f64 {
        self.options.bpm
    }

    /// Delay time as last set.
    pub fn delay_time(&self) -> DelayTime {
        self.delay_time
    }

    /// Engine options in effect.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Lifecycle state of the time-stretch extension.
    pub fn time_stretch_state(&self) -> TimeStretchState {
        self.time_stretch.state()
    }

    /// Warnings recorded since the last [`take_warnings`](Self::take_warnings).
    pub fn warnings(&self) -> &[EngineWarning] {
        &self.warnings
    }

    /// Drains the warning log.
    pub fn take_warnings(&mut self) -> Vec<EngineWarning> {
        std::mem::take(&mut self.warnings)
    }

    // --- Internals ---

    pub(crate) fn warn(&mut self, warning: EngineWarning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    fn set_known(&mut self, stage: StageId, name: &'static str, value: f64) {
        if let Err(err) = self.set_param(stage, name, value) {
            tracing::error!(%err, "stage parameter table mismatch");
        }
    }

    /// Writes the resolved delay time without touching its notation.
    fn write_delay_seconds(&mut self, seconds: f64) {
        match self.registry.param_descriptor(StageId::Delay, "delay_time") {
            Ok(desc) => self.write(StageId::Delay, desc, seconds),
            Err(err) => tracing::error!(%err, "stage parameter table mismatch"),
        }
    }

    /// Applies the range policy, then writes runtime and registry.
    ///
    /// The registry only changes once the runtime accepts the value, so an
    /// export never describes a state the live graph is not running.
    fn write(&mut self, stage: StageId, desc: &'static ParamDescriptor, value: f64) {
        let Some(value) = self.admit(stage, desc, value) else {
            return;
        };
        let node = self.graph.node(stage);
        if let Err(err) = self.runtime.set_param(node, desc.name, value) {
            self.warn(EngineWarning::RuntimeRejected {
                stage,
                param: desc.name,
                reason: err.to_string(),
            });
            return;
        }
        if let Err(err) = self.registry.set(stage, desc.name, value) {
            tracing::error!(%err, "stage parameter table mismatch");
            return;
        }
        tracing::debug!(%stage, param = desc.name, value, "parameter set");
    }

    fn admit(&mut self, stage: StageId, desc: &'static ParamDescriptor, value: f64) -> Option<f64> {
        if !value.is_finite() {
            self.warn(EngineWarning::NonFinite {
                stage,
                param: desc.name,
            });
            return None;
        }
        if desc.contains(value) {
            return Some(value);
        }
        match self.options.out_of_range {
            OutOfRangePolicy::Clamp => {
                let applied = desc.clamp(value);
                self.warn(EngineWarning::Clamped {
                    stage,
                    param: desc.name,
                    requested: value,
                    applied,
                });
                Some(applied)
            }
            OutOfRangePolicy::PassThrough => {
                self.warn(EngineWarning::OutOfRange {
                    stage,
                    param: desc.name,
                    value,
                });
                Some(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeadlessRuntime;
    use stemfx_core::NoteDivision;

    fn engine() -> AudioEngine<HeadlessRuntime> {
        AudioEngine::new(HeadlessRuntime::new(), EngineOptions::default()).unwrap()
    }

    fn runtime_value(engine: &AudioEngine<HeadlessRuntime>, stage: StageId, name: &str) -> Option<f64> {
        engine.runtime().param(engine.graph().node(stage), name)
    }

    #[test]
    fn test_setters_write_registry_and_runtime() {
        let mut engine = engine();
        engine.set_reverb(0.4);
        assert_eq!(engine.param(StageId::Reverb, "wet"), Ok(0.4));
        assert_eq!(runtime_value(&engine, StageId::Reverb, "wet"), Some(0.4));
    }

    #[test]
    fn test_every_setter_reaches_its_stage() {
        let mut engine = engine();
        engine.set_input_gain(0.5);
        engine.set_master_gain(2.0);
        engine.set_noise_gate(-40.0);
        engine.set_compressor_threshold(-24.0);
        engine.set_compressor_ratio(4.0);
        engine.set_compressor_attack(0.01);
        engine.set_compressor_release(0.3);
        engine.set_limiter(-1.0);
        engine.set_distortion(0.3);
        engine.set_bit_depth(8.0);
        engine.set_waveshaper_order(20.0);
        engine.set_lowpass(5000.0);
        engine.set_highpass(80.0);
        engine.set_bandpass(900.0, 2.0);
        engine.set_notch(60.0, 10.0);
        engine.set_peaking(3000.0, 4.0, 0.7);
        engine.set_low_shelf(120.0, 3.0);
        engine.set_high_shelf(9000.0, -3.0);
        engine.set_phaser(0.5, 3.0, 0.4);
        engine.set_chorus(1.5, 0.7, 0.3);
        engine.set_pitch_shift(-2.0);
        engine.set_delay(0.4, 0.3);
        engine.set_delay_time(DelayTime::Seconds(0.5));
        engine.set_reverb(0.2);
        engine.set_reverb_decay(3.0);
        engine.set_pan(-0.5);

        assert!(engine.warnings().is_empty(), "{:?}", engine.warnings());
        assert_eq!(engine.export().len(), StageId::COUNT);
        assert_eq!(runtime_value(&engine, StageId::Notch, "q"), Some(10.0));
        assert_eq!(runtime_value(&engine, StageId::Reverb, "decay"), Some(3.0));
    }

    #[test]
    fn test_setters_do_not_touch_topology() {
        let mut engine = engine();
        let before: Vec<_> = engine
            .graph()
            .iter()
            .map(|(_, n)| engine.runtime().outputs(n).to_vec())
            .collect();
        engine.set_lowpass(1000.0);
        engine.set_master_gain(0.0);
        let after: Vec<_> = engine
            .graph()
            .iter()
            .map(|(_, n)| engine.runtime().outputs(n).to_vec())
            .collect();
        assert_eq!(before, after);
        assert_eq!(engine.runtime().node_count(), StageId::COUNT);
    }

    #[test]
    fn test_distortion_toggles_wet() {
        let mut engine = engine();
        engine.set_distortion(0.3);
        assert_eq!(engine.param(StageId::Distortion, "wet"), Ok(1.0));
        engine.set_distortion(0.0);
        assert_eq!(engine.param(StageId::Distortion, "wet"), Ok(0.0));
    }

    #[test]
    fn test_out_of_range_is_clamped_with_warning() {
        let mut engine = engine();
        engine.set_pan(3.0);
        assert_eq!(engine.param(StageId::Panner, "pan"), Ok(1.0));
        assert_eq!(
            engine.warnings(),
            &[EngineWarning::Clamped {
                stage: StageId::Panner,
                param: "pan",
                requested: 3.0,
                applied: 1.0,
            }]
        );
    }

    #[test]
    fn test_pass_through_policy() {
        let options = EngineOptions {
            out_of_range: OutOfRangePolicy::PassThrough,
            ..EngineOptions::default()
        };
        let mut engine = AudioEngine::new(HeadlessRuntime::new(), options).unwrap();
        engine.set_compressor_threshold(6.0);
        assert_eq!(engine.param(StageId::Compressor, "threshold"), Ok(6.0));
        assert!(matches!(engine.warnings()[0], EngineWarning::OutOfRange { .. }));
    }

    #[test]
    fn test_non_finite_is_ignored() {
        let mut engine = engine();
        engine.set_lowpass(5000.0);
        engine.set_lowpass(f64::NAN);
        assert_eq!(engine.param(StageId::Lowpass, "frequency"), Ok(5000.0));
        assert_eq!(engine.take_warnings().len(), 1);
        assert!(engine.warnings().is_empty());
    }

    #[test]
    fn test_set_param_by_name() {
        let mut engine = engine();
        engine.set_param(StageId::Chorus, "depth", 0.9).unwrap();
        assert_eq!(engine.param(StageId::Chorus, "depth"), Ok(0.9));
        assert!(engine.set_param(StageId::Chorus, "rate", 1.0).is_err());
    }

    #[test]
    fn test_note_delay_follows_tempo() {
        let mut engine = engine();
        engine.set_delay_time(NoteDivision::Quarter);
        assert_eq!(engine.param(StageId::Delay, "delay_time"), Ok(0.5));
        engine.set_bpm(60.0);
        assert_eq!(engine.param(StageId::Delay, "delay_time"), Ok(1.0));
        assert_eq!(engine.delay_time(), DelayTime::Note(NoteDivision::Quarter));
    }

    #[test]
    fn test_delay_notation_survives_construction_tempo() {
        let options = EngineOptions {
            bpm: 100.0,
            ..EngineOptions::default()
        };
        let mut engine = AudioEngine::new(HeadlessRuntime::new(), options).unwrap();
        assert_eq!(engine.delay_time(), DelayTime::Note(NoteDivision::Eighth));
        engine.set_bpm(150.0);
        assert_eq!(engine.param(StageId::Delay, "delay_time"), Ok(0.2));
    }

    #[test]
    fn test_rejected_write_keeps_registry_in_sync() {
        let mut engine = engine();
        engine.runtime_mut().fail_next_param_writes(1);
        engine.set_reverb(0.4);

        assert_eq!(engine.param(StageId::Reverb, "wet"), Ok(0.0));
        assert_eq!(runtime_value(&engine, StageId::Reverb, "wet"), Some(0.0));
        assert!(engine.export().is_empty());
        assert!(matches!(
            engine.warnings(),
            [EngineWarning::RuntimeRejected { stage: StageId::Reverb, param: "wet", .. }]
        ));

        engine.set_reverb(0.4);
        assert_eq!(engine.export().types(), vec!["Reverb"]);
    }

    #[test]
    fn test_absolute_delay_ignores_tempo() {
        let mut engine = engine();
        engine.set_param(StageId::Delay, "delay_time", 0.3).unwrap();
        engine.set_bpm(90.0);
        assert_eq!(engine.param(StageId::Delay, "delay_time"), Ok(0.3));
        assert_eq!(engine.delay_time(), DelayTime::Seconds(0.3));
    }

    #[test]
    fn test_options_bpm_resolves_default_delay() {
        let options = EngineOptions {
            bpm: 90.0,
            ..EngineOptions::default()
        };
        let engine = AudioEngine::new(HeadlessRuntime::new(), options).unwrap();
        assert_eq!(engine.bpm(), 90.0);
        let expected = NoteDivision::Eighth.to_seconds(90.0);
        assert_eq!(engine.param(StageId::Delay, "delay_time"), Ok(expected));
    }

    #[test]
    fn test_invalid_bpm_is_ignored() {
        let mut engine = engine();
        engine.set_bpm(0.0);
        assert_eq!(engine.bpm(), DEFAULT_BPM);
        assert_eq!(engine.warnings(), &[EngineWarning::InvalidTempo { bpm: 0.0 }]);
    }

    #[test]
    fn test_transport_without_source_warns() {
        let mut engine = engine();
        engine.play().unwrap();
        engine.stop().unwrap();
        assert_eq!(engine.warnings().len(), 2);
    }

    #[test]
    fn test_reset_restores_neutral_state() {
        let mut engine = engine();
        engine.set_reverb(0.5);
        engine.set_delay_time(NoteDivision::Half);
        engine.set_lowpass(300.0);
        engine.reset();
        assert!(engine.export().is_empty());
        assert_eq!(engine.param(StageId::Delay, "delay_time"), Ok(0.25));
        assert_eq!(runtime_value(&engine, StageId::Lowpass, "frequency"), Some(20000.0));
    }
}
