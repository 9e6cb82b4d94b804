//! Polyphonic engine: voice pool, allocation, shared LFO and master gain.

use tessera_core::{FilterMode, Lfo, LfoShape};

use crate::blend::WaveMix;
use crate::command::Command;
use crate::digital::DigitalMode;
use crate::envelope::{AdsrParam, EnvelopeParams};
use crate::oscillator::Waveform;
use crate::preset::{preset, preset_name};
use crate::voice::{FilterKind, Voice};

/// Voice count of the default engine.
pub const DEFAULT_VOICES: usize = 4;

/// Length of the fade applied to a stolen voice under
/// [`StealPolicy::FastRelease`].
pub const STEAL_FADE_SAMPLES: u32 = 64;

/// Summed voices are scaled by this before master volume.
const HEADROOM: f64 = 0.5;

/// What happens on note-on when every voice is busy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StealPolicy {
    /// Hard-restart slot 0 with the new note. The old note stops abruptly.
    #[default]
    FirstSlot,
    /// Fade slot 0 out over [`STEAL_FADE_SAMPLES`], then start the new note.
    FastRelease,
}

impl StealPolicy {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            StealPolicy::FirstSlot => "first-slot",
            StealPolicy::FastRelease => "fast-release",
        }
    }
}

/// Fixed-size polyphonic synthesizer engine.
///
/// Owns its voices and one shared LFO. Parameter setters fan out to every
/// voice. Output is mono; [`process_stereo`](Self::process_stereo) duplicates
/// it to both channels.
///
/// # Example
///
/// ```rust
/// use tessera_synth::SynthEngine;
///
/// let mut engine: SynthEngine = SynthEngine::new(48000.0);
/// engine.load_preset(1); // Bass
/// engine.note_on(36, 1.0);
/// engine.note_on(43, 0.8);
///
/// let mut block = [0.0; 256];
/// engine.process_block(&mut block);
/// assert_eq!(engine.active_voice_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SynthEngine<const N: usize = DEFAULT_VOICES> {
    voices: [Voice; N],
    lfo: Lfo,
    lfo_depth: f64,
    master_volume: f64,
    current_preset: usize,
    steal_policy: StealPolicy,
    sample_rate: f64,
}

impl<const N: usize> Default for SynthEngine<N> {
    fn default() -> Self {
        Self::new(tessera_core::NATIVE_SAMPLE_RATE)
    }
}

impl<const N: usize> SynthEngine<N> {
    /// Create an engine with preset 0 loaded.
    pub fn new(sample_rate: f64) -> Self {
        Self::with_seed(sample_rate, 0)
    }

    /// Create an engine whose noise sources all derive from `seed`.
    pub fn with_seed(sample_rate: f64, seed: u32) -> Self {
        const { assert!(N > 0, "an engine needs at least one voice") };

        let mut lfo = Lfo::with_seed(sample_rate, seed.wrapping_add(3 * N as u32));
        lfo.set_rate(2.0);
        lfo.set_shape(LfoShape::Triangle);

        let mut engine = Self {
            voices: core::array::from_fn(|i| {
                Voice::with_seed(sample_rate, seed.wrapping_add(3 * i as u32))
            }),
            lfo,
            lfo_depth: 0.2,
            master_volume: 0.8,
            current_preset: 0,
            steal_policy: StealPolicy::default(),
            sample_rate,
        };
        engine.load_preset(0);
        engine
    }

    /// Propagate a new sample rate to every voice and the LFO.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.lfo.set_sample_rate(sample_rate);
        self.for_each_voice(|v| v.set_sample_rate(sample_rate));
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    // --- Notes ---

    /// Start a note on the first free voice, stealing slot 0 if none is free.
    pub fn note_on(&mut self, note: u8, velocity: f64) {
        if let Some(voice) = self.voices.iter_mut().find(|v| !v.is_busy()) {
            voice.note_on(note, velocity);
            return;
        }
        let slot = &mut self.voices[0];
        match self.steal_policy {
            StealPolicy::FirstSlot => {
                slot.kill();
                slot.note_on(note, velocity);
            }
            StealPolicy::FastRelease => slot.steal(note, velocity, STEAL_FADE_SAMPLES),
        }
    }

    /// Release every active voice holding `note`.
    pub fn note_off(&mut self, note: u8) {
        for voice in &mut self.voices {
            if voice.is_active() && voice.note() == note {
                voice.note_off();
            }
            voice.release_pending(note);
        }
    }

    /// Release every voice.
    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            voice.note_off();
            voice.release_pending_all();
        }
    }

    /// Hard-stop every voice.
    pub fn panic(&mut self) {
        self.for_each_voice(Voice::kill);
    }

    // --- Presets ---

    /// Apply factory preset `index` to every voice. Out-of-range is a no-op.
    pub fn load_preset(&mut self, index: usize) {
        let Some(p) = preset(index) else {
            return;
        };
        self.for_each_voice(|v| v.apply_preset(p));
        self.master_volume = p.master_volume;
        self.current_preset = index;
    }

    /// Index of the last loaded preset.
    pub fn current_preset(&self) -> usize {
        self.current_preset
    }

    /// Name of the last loaded preset.
    pub fn current_preset_name(&self) -> &'static str {
        preset_name(self.current_preset)
    }

    // --- Voice parameter fan-out ---

    /// Wave mix for both oscillators of every voice.
    pub fn set_wave_mix(&mut self, mix: WaveMix) {
        self.for_each_voice(|v| v.set_wave_mix(mix));
    }

    /// One wave-mix weight on every voice.
    pub fn set_wave_weight(&mut self, waveform: Waveform, weight: f64) {
        self.for_each_voice(|v| v.set_wave_weight(waveform, weight));
    }

    /// Single waveform on both oscillators of every voice.
    pub fn set_osc1_waveform(&mut self, waveform: Waveform) {
        self.for_each_voice(|v| v.set_osc1_waveform(waveform));
    }

    /// Single waveform on the second oscillator of every voice.
    pub fn set_osc2_waveform(&mut self, waveform: Waveform) {
        self.for_each_voice(|v| v.set_osc2_waveform(waveform));
    }

    /// Oscillator crossfade.
    pub fn set_osc_mix(&mut self, mix: f64) {
        self.for_each_voice(|v| v.set_osc_mix(mix));
    }

    /// Base filter cutoff in Hz.
    pub fn set_filter_cutoff(&mut self, freq: f64) {
        self.for_each_voice(|v| v.set_filter_cutoff(freq));
    }

    /// Filter resonance.
    pub fn set_filter_resonance(&mut self, res: f64) {
        self.for_each_voice(|v| v.set_filter_resonance(res));
    }

    /// Filter drive.
    pub fn set_filter_drive(&mut self, drive: f64) {
        self.for_each_voice(|v| v.set_filter_drive(drive));
    }

    /// Filter topology.
    pub fn set_filter_kind(&mut self, kind: FilterKind) {
        self.for_each_voice(|v| v.set_filter_kind(kind));
    }

    /// State-variable filter output mode.
    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.for_each_voice(|v| v.set_filter_mode(mode));
    }

    /// Filter-envelope depth.
    pub fn set_filter_env_depth(&mut self, depth: f64) {
        self.for_each_voice(|v| v.set_filter_env_depth(depth));
    }

    /// Amplitude ADSR.
    pub fn set_amp_envelope(&mut self, params: EnvelopeParams) {
        self.for_each_voice(|v| v.set_amp_envelope(params));
    }

    /// One amplitude ADSR stage.
    pub fn set_amp_param(&mut self, param: AdsrParam, value: f64) {
        self.for_each_voice(|v| v.set_amp_param(param, value));
    }

    /// Filter ADSR.
    pub fn set_filter_envelope(&mut self, params: EnvelopeParams) {
        self.for_each_voice(|v| v.set_filter_envelope(params));
    }

    /// One filter ADSR stage.
    pub fn set_filter_param(&mut self, param: AdsrParam, value: f64) {
        self.for_each_voice(|v| v.set_filter_param(param, value));
    }

    /// Digital engine crossfade.
    pub fn set_digital_level(&mut self, level: f64) {
        self.for_each_voice(|v| v.set_digital_level(level));
    }

    /// Digital engine algorithm.
    pub fn set_digital_mode(&mut self, mode: DigitalMode) {
        self.for_each_voice(|v| v.set_digital_mode(mode));
    }

    /// Digital engine modulation index (0..1 control).
    pub fn set_digital_mod_index(&mut self, amount: f64) {
        self.for_each_voice(|v| v.set_digital_mod_index(amount));
    }

    /// Digital engine ratio (0..1 control).
    pub fn set_digital_ratio(&mut self, amount: f64) {
        self.for_each_voice(|v| v.set_digital_ratio(amount));
    }

    /// Digital engine morph.
    pub fn set_digital_shape(&mut self, shape: f64) {
        self.for_each_voice(|v| v.set_digital_shape(shape));
    }

    // --- Global parameters ---

    /// LFO rate in Hz (0.01 to 100).
    pub fn set_lfo_rate(&mut self, hz: f64) {
        self.lfo.set_rate(hz);
    }

    /// LFO rate from a 0..1 control.
    pub fn set_lfo_rate_normalized(&mut self, param: f64) {
        self.lfo.set_rate_normalized(param);
    }

    /// LFO shape.
    pub fn set_lfo_shape(&mut self, shape: LfoShape) {
        self.lfo.set_shape(shape);
    }

    /// LFO depth, clamped to [0, 1].
    pub fn set_lfo_depth(&mut self, depth: f64) {
        self.lfo_depth = depth.clamp(0.0, 1.0);
    }

    /// LFO depth.
    pub fn lfo_depth(&self) -> f64 {
        self.lfo_depth
    }

    /// Shared LFO.
    pub fn lfo(&self) -> &Lfo {
        &self.lfo
    }

    /// Master volume, clamped to [0, 1].
    pub fn set_master_volume(&mut self, volume: f64) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    /// Master volume.
    pub fn master_volume(&self) -> f64 {
        self.master_volume
    }

    /// Voice stealing policy.
    pub fn set_steal_policy(&mut self, policy: StealPolicy) {
        self.steal_policy = policy;
    }

    /// Voice stealing policy.
    pub fn steal_policy(&self) -> StealPolicy {
        self.steal_policy
    }

    // --- Introspection ---

    /// Number of voices currently sounding.
    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// All voices.
    pub fn voices(&self) -> &[Voice; N] {
        &self.voices
    }

    // --- Commands ---

    /// Apply one control command. Effect commands are ignored here.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::NoteOn { note, velocity } => self.note_on(note, velocity),
            Command::NoteOff { note } => self.note_off(note),
            Command::AllNotesOff => self.all_notes_off(),
            Command::LoadPreset(index) => self.load_preset(index),
            Command::SetWaveMix(mix) => self.set_wave_mix(mix),
            Command::SetWaveWeight { wave, value } => self.set_wave_weight(wave, value),
            Command::SetOsc1Waveform(w) => self.set_osc1_waveform(w),
            Command::SetOsc2Waveform(w) => self.set_osc2_waveform(w),
            Command::SetOscMix(mix) => self.set_osc_mix(mix),
            Command::SetFilterCutoff(freq) => self.set_filter_cutoff(freq),
            Command::SetFilterResonance(res) => self.set_filter_resonance(res),
            Command::SetFilterDrive(drive) => self.set_filter_drive(drive),
            Command::SetFilterKind(kind) => self.set_filter_kind(kind),
            Command::SetFilterMode(mode) => self.set_filter_mode(mode),
            Command::SetFilterEnvDepth(depth) => self.set_filter_env_depth(depth),
            Command::SetAmpEnvelope(params) => self.set_amp_envelope(params),
            Command::SetAmpStage { param, value } => self.set_amp_param(param, value),
            Command::SetFilterEnvelope(params) => self.set_filter_envelope(params),
            Command::SetFilterStage { param, value } => self.set_filter_param(param, value),
            Command::SetDigitalLevel(level) => self.set_digital_level(level),
            Command::SetDigitalMode(mode) => self.set_digital_mode(mode),
            Command::SetDigitalModIndex(amount) => self.set_digital_mod_index(amount),
            Command::SetDigitalRatio(amount) => self.set_digital_ratio(amount),
            Command::SetDigitalShape(shape) => self.set_digital_shape(shape),
            Command::SetLfoRate(hz) => self.set_lfo_rate(hz),
            Command::SetLfoRateNormalized(p) => self.set_lfo_rate_normalized(p),
            Command::SetLfoShape(shape) => self.set_lfo_shape(shape),
            Command::SetLfoDepth(depth) => self.set_lfo_depth(depth),
            Command::SetMasterVolume(volume) => self.set_master_volume(volume),
            Command::SetStealPolicy(policy) => self.set_steal_policy(policy),
            Command::SetEffectParam { .. }
            | Command::SetEffectEnabled { .. }
            | Command::ClearEffects => {}
        }
    }

    // --- Processing ---

    /// Render one mono sample.
    #[inline]
    pub fn process(&mut self) -> f64 {
        let lfo = self.lfo.process() * self.lfo_depth;
        let mut sum = 0.0;
        for voice in &mut self.voices {
            if voice.is_busy() {
                sum += voice.process(lfo);
            }
        }
        sum * self.master_volume * HEADROOM
    }

    /// Render one frame, the mono sum on both channels.
    #[inline]
    pub fn process_stereo(&mut self) -> (f64, f64) {
        let s = self.process();
        (s, s)
    }

    /// Fill `out` with mono samples.
    pub fn process_block(&mut self, out: &mut [f64]) {
        for sample in out.iter_mut() {
            *sample = self.process();
        }
    }

    /// Fill `left` and `right` with stereo frames.
    ///
    /// Processes `min(left.len(), right.len())` frames.
    pub fn process_block_stereo(&mut self, left: &mut [f64], right: &mut [f64]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            (*l, *r) = self.process_stereo();
        }
    }

    fn for_each_voice(&mut self, f: impl FnMut(&mut Voice)) {
        self.voices.iter_mut().for_each(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 48000.0;

    #[test]
    fn test_construction_loads_init() {
        let engine: SynthEngine = SynthEngine::new(SR);
        assert_eq!(engine.current_preset(), 0);
        assert_eq!(engine.current_preset_name(), "Init");
        assert_eq!(engine.master_volume(), 0.8);
        assert_eq!(engine.lfo_depth(), 0.2);
        assert_eq!(engine.lfo().rate(), 2.0);
        assert_eq!(engine.lfo().shape(), LfoShape::Triangle);
        for v in engine.voices() {
            assert_eq!(v.wave_mix(), WaveMix::solo(Waveform::Sine));
            assert_eq!(v.filter_env_depth(), 0.3);
        }
    }

    #[test]
    fn test_silent_when_idle() {
        let mut engine: SynthEngine = SynthEngine::new(SR);
        for _ in 0..100 {
            assert_eq!(engine.process(), 0.0);
        }
    }

    #[test]
    fn test_note_off_releases_duplicates() {
        let mut engine: SynthEngine = SynthEngine::new(SR);
        engine.note_on(60, 1.0);
        engine.note_on(60, 1.0);
        engine.note_on(64, 1.0);
        engine.note_off(60);
        let releasing = engine
            .voices()
            .iter()
            .filter(|v| v.amp_envelope().state() == crate::EnvelopeState::Release)
            .count();
        assert_eq!(releasing, 2);
    }

    #[test]
    fn test_load_preset_out_of_range_is_noop() {
        let mut engine: SynthEngine = SynthEngine::new(SR);
        engine.load_preset(4);
        engine.load_preset(10);
        assert_eq!(engine.current_preset(), 4);
        assert_eq!(engine.master_volume(), 1.0);
        assert_eq!(engine.voices()[0].filter_cutoff(), 200.0);
    }

    #[test]
    fn test_preset_leaves_lfo_alone() {
        let mut engine: SynthEngine = SynthEngine::new(SR);
        engine.set_lfo_rate(7.0);
        engine.set_lfo_depth(0.9);
        engine.load_preset(3);
        assert_eq!(engine.lfo().rate(), 7.0);
        assert_eq!(engine.lfo_depth(), 0.9);
    }

    #[test]
    fn test_stereo_duplicates_mono() {
        let mut engine: SynthEngine = SynthEngine::with_seed(SR, 4);
        engine.note_on(60, 1.0);
        for _ in 0..1000 {
            let (l, r) = engine.process_stereo();
            assert_eq!(l, r);
        }
    }

    #[test]
    fn test_apply_routes_commands() {
        let mut engine: SynthEngine = SynthEngine::new(SR);
        engine.apply(Command::SetMasterVolume(2.0));
        assert_eq!(engine.master_volume(), 1.0);
        engine.apply(Command::SetFilterCutoff(900.0));
        assert!(engine.voices().iter().all(|v| v.filter_cutoff() == 900.0));
        engine.apply(Command::NoteOn {
            note: 62,
            velocity: 0.5,
        });
        assert_eq!(engine.active_voice_count(), 1);
        engine.apply(Command::ClearEffects);
        engine.apply(Command::AllNotesOff);
        assert!(
            engine
                .voices()
                .iter()
                .all(|v| v.amp_envelope().state() != crate::EnvelopeState::Attack)
        );
    }

    #[test]
    fn test_fast_release_steal_waits_for_fade() {
        let mut engine: SynthEngine<2> = SynthEngine::new(SR);
        engine.set_steal_policy(StealPolicy::FastRelease);
        engine.note_on(60, 1.0);
        engine.note_on(62, 1.0);
        for _ in 0..100 {
            engine.process();
        }
        engine.note_on(64, 1.0);
        assert_eq!(engine.voices()[0].note(), 60);
        assert!(engine.voices()[0].is_fading());

        for _ in 0..STEAL_FADE_SAMPLES {
            engine.process();
        }
        assert_eq!(engine.voices()[0].note(), 64);
        assert_eq!(engine.voices()[1].note(), 62);
    }
}
