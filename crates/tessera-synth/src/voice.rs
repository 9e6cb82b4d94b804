//! A single synthesizer voice.
//!
//! Two blend oscillators (the second detuned by a fixed ratio), an optional
//! digital-engine layer, a filter and two envelopes combined into one sample
//! per call.
//!
//! ## Signal Flow
//!
//! ```text
//! osc1 ─┐
//!       ├─ crossfade(osc_mix) ─ crossfade(digital_level) ─ filter ─ × amp env × velocity
//! osc2 ─┘                              │                     ▲
//!                      digital engine ─┘   cutoff = base × 2^(fenv × depth × 4) + lfo × 1000
//! ```

use tessera_core::{FilterMode, LadderFilter, StateVariableFilter, midi_to_freq};

use crate::blend::{BlendOscillator, WaveMix};
use crate::digital::{DigitalEngine, DigitalMode};
use crate::envelope::{Adsr, AdsrParam, EnvelopeParams};
use crate::oscillator::Waveform;
use crate::preset::Preset;

/// Frequency ratio of the second oscillator relative to the first.
pub const OSC2_DETUNE_RATIO: f64 = 1.002;
/// Cutoff offset in Hz per unit of incoming LFO value.
pub const LFO_CUTOFF_HZ: f64 = 1000.0;
/// Lowest modulated cutoff in Hz.
pub const MIN_CUTOFF: f64 = 20.0;
/// Highest modulated cutoff in Hz.
pub const MAX_CUTOFF: f64 = 20000.0;

/// Filter topology used by a voice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// 2-pole Chamberlin state-variable filter with selectable mode.
    #[default]
    StateVariable,
    /// 4-pole lowpass ladder.
    Ladder,
}

impl FilterKind {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::StateVariable => "SVF",
            FilterKind::Ladder => "Ladder",
        }
    }
}

/// A note waiting for a fading voice to finish.
#[derive(Debug, Clone, Copy)]
struct PendingNote {
    note: u8,
    velocity: f64,
    released: bool,
}

/// Single polyphonic voice.
///
/// ## Parameters
/// - `base_cutoff`: 20.0 to 20000.0 Hz (default 2000.0)
/// - `env_depth`: filter-envelope depth 0.0 to 1.0 (default 0.5)
/// - `osc_mix`: 0 = osc1 only, 1 = osc2 only (default 0.5)
/// - `digital_level`: digital engine crossfade 0.0 to 1.0 (default 0.0)
///
/// # Example
///
/// ```rust
/// use tessera_synth::Voice;
///
/// let mut voice = Voice::new(48000.0);
/// voice.note_on(60, 0.8);
/// assert!(voice.is_active());
///
/// let sample = voice.process(0.0);
/// assert!(sample.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Voice {
    osc1: BlendOscillator,
    osc2: BlendOscillator,
    digital: DigitalEngine,
    svf: StateVariableFilter,
    ladder: LadderFilter,
    filter_kind: FilterKind,
    amp_env: Adsr,
    filter_env: Adsr,

    active: bool,
    note: u8,
    velocity: f64,

    base_cutoff: f64,
    env_depth: f64,
    osc_mix: f64,
    digital_level: f64,

    fade_remaining: u32,
    fade_length: u32,
    pending: Option<PendingNote>,
}

impl Default for Voice {
    fn default() -> Self {
        Self::new(tessera_core::NATIVE_SAMPLE_RATE)
    }
}

impl Voice {
    /// Create an idle voice.
    pub fn new(sample_rate: f64) -> Self {
        Self::with_seed(sample_rate, 0)
    }

    /// Create an idle voice; its noise sources derive from `seed`.
    pub fn with_seed(sample_rate: f64, seed: u32) -> Self {
        Self {
            osc1: BlendOscillator::with_seed(sample_rate, seed),
            osc2: BlendOscillator::with_seed(sample_rate, seed.wrapping_add(1)),
            digital: DigitalEngine::with_seed(sample_rate, seed.wrapping_add(2)),
            svf: StateVariableFilter::new(sample_rate),
            ladder: LadderFilter::new(sample_rate),
            filter_kind: FilterKind::default(),
            amp_env: Adsr::new(sample_rate),
            filter_env: Adsr::new(sample_rate),
            active: false,
            note: 0,
            velocity: 0.0,
            base_cutoff: 2000.0,
            env_depth: 0.5,
            osc_mix: 0.5,
            digital_level: 0.0,
            fade_remaining: 0,
            fade_length: 0,
            pending: None,
        }
    }

    /// Propagate a new sample rate to every component.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.osc1.set_sample_rate(sample_rate);
        self.osc2.set_sample_rate(sample_rate);
        self.digital.set_sample_rate(sample_rate);
        self.svf.set_sample_rate(sample_rate);
        self.ladder.set_sample_rate(sample_rate);
        self.amp_env.set_sample_rate(sample_rate);
        self.filter_env.set_sample_rate(sample_rate);
    }

    // --- Note control ---

    /// Start `note` at `velocity` (clamped to [0, 1]).
    ///
    /// Retriggers both envelopes from their current level and clears the
    /// filter state. Oscillator phases keep running.
    pub fn note_on(&mut self, note: u8, velocity: f64) {
        self.note = note;
        self.velocity = velocity.clamp(0.0, 1.0);
        self.active = true;
        self.fade_remaining = 0;
        self.pending = None;

        let freq = midi_to_freq(note);
        self.osc1.set_frequency(freq);
        self.osc2.set_frequency(freq * OSC2_DETUNE_RATIO);
        self.digital.set_frequency(freq);

        self.amp_env.note_on();
        self.filter_env.note_on();
        self.svf.reset();
        self.ladder.reset();
    }

    /// Release both envelopes.
    pub fn note_off(&mut self) {
        self.amp_env.note_off();
        self.filter_env.note_off();
    }

    /// Stop immediately with no release tail.
    pub fn kill(&mut self) {
        self.active = false;
        self.amp_env.reset();
        self.filter_env.reset();
        self.fade_remaining = 0;
        self.pending = None;
    }

    /// Take over this voice for a new note after a linear fade of
    /// `ramp_samples`. With a zero ramp, or when the voice is already
    /// silent, the new note starts at once.
    ///
    /// A second steal during the fade replaces the waiting note without
    /// restarting the ramp.
    pub fn steal(&mut self, note: u8, velocity: f64, ramp_samples: u32) {
        if ramp_samples == 0 || !self.is_active() {
            self.kill();
            self.note_on(note, velocity);
            return;
        }
        if self.fade_remaining == 0 {
            self.fade_length = ramp_samples;
            self.fade_remaining = ramp_samples;
        }
        self.pending = Some(PendingNote {
            note,
            velocity,
            released: false,
        });
    }

    /// Mark a waiting note as released so it starts in its release stage.
    pub fn release_pending(&mut self, note: u8) {
        if let Some(pending) = self.pending.as_mut().filter(|p| p.note == note) {
            pending.released = true;
        }
    }

    /// Release a waiting note regardless of its number.
    pub fn release_pending_all(&mut self) {
        if let Some(pending) = self.pending.as_mut() {
            pending.released = true;
        }
    }

    /// True while the active flag is set and the amp envelope is not idle.
    pub fn is_active(&self) -> bool {
        self.active && self.amp_env.is_active()
    }

    /// True while sounding or holding a note that has yet to start.
    pub fn is_busy(&self) -> bool {
        self.is_active() || self.pending.is_some()
    }

    /// True during a steal fade.
    pub fn is_fading(&self) -> bool {
        self.fade_remaining > 0
    }

    /// Note number of the current (or last) note.
    pub fn note(&self) -> u8 {
        self.note
    }

    /// Note number waiting behind a steal fade.
    pub fn pending_note(&self) -> Option<u8> {
        self.pending.map(|p| p.note)
    }

    /// Velocity of the current note.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    // --- Oscillators ---

    /// Set both oscillators' wave mix.
    pub fn set_wave_mix(&mut self, mix: WaveMix) {
        self.osc1.set_mix(mix);
        self.osc2.set_mix(mix);
    }

    /// Set one weight on both oscillators, keeping the others from osc1.
    pub fn set_wave_weight(&mut self, waveform: Waveform, weight: f64) {
        let mut mix = self.osc1.mix();
        mix.set(waveform, weight);
        self.set_wave_mix(mix);
    }

    /// Wave mix of the first oscillator.
    pub fn wave_mix(&self) -> WaveMix {
        self.osc1.mix()
    }

    /// Play a single waveform on both oscillators.
    pub fn set_osc1_waveform(&mut self, waveform: Waveform) {
        self.set_wave_mix(WaveMix::solo(waveform));
    }

    /// Play a single waveform on the second oscillator only.
    pub fn set_osc2_waveform(&mut self, waveform: Waveform) {
        self.osc2.set_mix(WaveMix::solo(waveform));
    }

    /// First oscillator.
    pub fn osc1(&self) -> &BlendOscillator {
        &self.osc1
    }

    /// Second (detuned) oscillator.
    pub fn osc2(&self) -> &BlendOscillator {
        &self.osc2
    }

    /// Oscillator crossfade, clamped to [0, 1].
    pub fn set_osc_mix(&mut self, mix: f64) {
        self.osc_mix = mix.clamp(0.0, 1.0);
    }

    /// Oscillator crossfade.
    pub fn osc_mix(&self) -> f64 {
        self.osc_mix
    }

    // --- Digital engine ---

    /// Digital engine crossfade, clamped to [0, 1].
    pub fn set_digital_level(&mut self, level: f64) {
        self.digital_level = level.clamp(0.0, 1.0);
    }

    /// Digital engine crossfade.
    pub fn digital_level(&self) -> f64 {
        self.digital_level
    }

    /// Digital engine algorithm.
    pub fn set_digital_mode(&mut self, mode: DigitalMode) {
        self.digital.set_mode(mode);
    }

    /// Digital engine modulation index from a 0..1 control.
    pub fn set_digital_mod_index(&mut self, amount: f64) {
        self.digital.set_mod_index(amount);
    }

    /// Digital engine ratio from a 0..1 control.
    pub fn set_digital_ratio(&mut self, amount: f64) {
        self.digital.set_ratio(amount);
    }

    /// Digital engine morph position.
    pub fn set_digital_shape(&mut self, shape: f64) {
        self.digital.set_shape(shape);
    }

    /// Digital engine.
    pub fn digital(&self) -> &DigitalEngine {
        &self.digital
    }

    // --- Filter ---

    /// Base cutoff in Hz, clamped to [20, 20000].
    pub fn set_filter_cutoff(&mut self, freq: f64) {
        self.base_cutoff = freq.clamp(MIN_CUTOFF, MAX_CUTOFF);
    }

    /// Base cutoff in Hz.
    pub fn filter_cutoff(&self) -> f64 {
        self.base_cutoff
    }

    /// Resonance; each filter clamps to its own range.
    pub fn set_filter_resonance(&mut self, res: f64) {
        self.svf.set_resonance(res);
        self.ladder.set_resonance(res);
    }

    /// Resonance of the active filter.
    pub fn filter_resonance(&self) -> f64 {
        match self.filter_kind {
            FilterKind::StateVariable => self.svf.resonance(),
            FilterKind::Ladder => self.ladder.resonance(),
        }
    }

    /// Pre-filter drive of the state-variable filter, clamped to [0, 1].
    pub fn set_filter_drive(&mut self, drive: f64) {
        self.svf.set_drive(drive);
    }

    /// State-variable filter drive.
    pub fn filter_drive(&self) -> f64 {
        self.svf.drive()
    }

    /// Select filter topology. The newly selected filter starts from rest.
    pub fn set_filter_kind(&mut self, kind: FilterKind) {
        if kind != self.filter_kind {
            self.svf.reset();
            self.ladder.reset();
        }
        self.filter_kind = kind;
    }

    /// Filter topology.
    pub fn filter_kind(&self) -> FilterKind {
        self.filter_kind
    }

    /// State-variable filter output mode.
    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.svf.set_mode(mode);
    }

    /// State-variable filter output mode.
    pub fn filter_mode(&self) -> FilterMode {
        self.svf.mode()
    }

    /// Cutoff applied on the most recent sample.
    pub fn current_cutoff(&self) -> f64 {
        match self.filter_kind {
            FilterKind::StateVariable => self.svf.cutoff(),
            FilterKind::Ladder => self.ladder.cutoff(),
        }
    }

    /// Filter-envelope depth, clamped to [0, 1].
    pub fn set_filter_env_depth(&mut self, depth: f64) {
        self.env_depth = depth.clamp(0.0, 1.0);
    }

    /// Filter-envelope depth.
    pub fn filter_env_depth(&self) -> f64 {
        self.env_depth
    }

    // --- Envelopes ---

    /// Set the amplitude ADSR.
    pub fn set_amp_envelope(&mut self, params: EnvelopeParams) {
        self.amp_env.set_params(params);
    }

    /// Set one amplitude ADSR stage.
    pub fn set_amp_param(&mut self, param: AdsrParam, value: f64) {
        self.amp_env.set_param(param, value);
    }

    /// Set the filter ADSR.
    pub fn set_filter_envelope(&mut self, params: EnvelopeParams) {
        self.filter_env.set_params(params);
    }

    /// Set one filter ADSR stage.
    pub fn set_filter_param(&mut self, param: AdsrParam, value: f64) {
        self.filter_env.set_param(param, value);
    }

    /// Amplitude envelope.
    pub fn amp_envelope(&self) -> &Adsr {
        &self.amp_env
    }

    /// Filter envelope.
    pub fn filter_envelope(&self) -> &Adsr {
        &self.filter_env
    }

    /// Bulk-assign a preset's sound parameters.
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.set_wave_mix(preset.wave_mix);
        self.set_filter_cutoff(preset.cutoff);
        self.set_filter_resonance(preset.resonance);
        self.set_filter_drive(preset.drive);
        self.set_amp_envelope(preset.amp_env);
        self.set_filter_envelope(preset.filter_env);
        self.set_filter_env_depth(preset.env_depth);
    }

    // --- Processing ---

    /// Render one sample. `lfo` is the already depth-scaled modulation value.
    #[inline]
    pub fn process(&mut self, lfo: f64) -> f64 {
        if !self.is_active() {
            self.active = false;
            if self.pending.is_none() {
                return 0.0;
            }
            self.start_pending();
        }

        let amp = self.amp_env.process();
        let fenv = self.filter_env.process();

        let o1 = self.osc1.process();
        let o2 = self.osc2.process();
        let mut mix = o1 * (1.0 - self.osc_mix) + o2 * self.osc_mix;
        if self.digital_level > 0.0 {
            let d = self.digital.process();
            mix = mix * (1.0 - self.digital_level) + d * self.digital_level;
        }

        let cutoff = self.base_cutoff * libm::pow(2.0, fenv * self.env_depth * 4.0)
            + lfo * LFO_CUTOFF_HZ;
        let cutoff = cutoff.clamp(MIN_CUTOFF, MAX_CUTOFF);

        let filtered = match self.filter_kind {
            FilterKind::StateVariable => {
                self.svf.set_cutoff(cutoff);
                self.svf.process(mix)
            }
            FilterKind::Ladder => {
                self.ladder.set_cutoff(cutoff);
                self.ladder.process(mix)
            }
        };

        let mut out = filtered * amp * self.velocity;

        if self.fade_remaining > 0 {
            out *= f64::from(self.fade_remaining) / f64::from(self.fade_length);
            self.fade_remaining -= 1;
            if self.fade_remaining == 0 {
                self.start_pending();
            }
        }

        out
    }

    fn start_pending(&mut self) {
        if let Some(next) = self.pending.take() {
            self.kill();
            self.note_on(next.note, next.velocity);
            if next.released {
                self.note_off();
            }
        }
        self.fade_remaining = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnvelopeState;

    const SR: f64 = 48000.0;

    #[test]
    fn test_defaults() {
        let voice = Voice::new(SR);
        assert!(!voice.is_active());
        assert_eq!(voice.filter_cutoff(), 2000.0);
        assert_eq!(voice.filter_env_depth(), 0.5);
        assert_eq!(voice.osc_mix(), 0.5);
        assert_eq!(voice.digital_level(), 0.0);
        assert_eq!(voice.wave_mix(), WaveMix::solo(Waveform::Saw));
    }

    #[test]
    fn test_note_on_sets_detuned_frequencies() {
        let mut voice = Voice::new(SR);
        voice.note_on(69, 1.0);
        assert!((voice.osc1().frequency() - 440.0).abs() < 1e-9);
        assert!((voice.osc2().frequency() - 440.0 * OSC2_DETUNE_RATIO).abs() < 1e-9);
        assert!((voice.digital().frequency() - 440.0).abs() < 1e-9);
    }

    #[test]
    fn test_inactive_voice_is_silent() {
        let mut voice = Voice::new(SR);
        assert_eq!(voice.process(0.5), 0.0);
    }

    #[test]
    fn test_note_off_releases_to_idle() {
        let mut voice = Voice::new(SR);
        voice.set_amp_envelope(EnvelopeParams::new(0.001, 0.01, 0.5, 0.01));
        voice.note_on(60, 1.0);
        for _ in 0..2000 {
            voice.process(0.0);
        }
        voice.note_off();
        assert_eq!(voice.amp_envelope().state(), EnvelopeState::Release);
        for _ in 0..48000 {
            voice.process(0.0);
        }
        assert!(!voice.is_active());
    }

    #[test]
    fn test_kill_is_immediate() {
        let mut voice = Voice::new(SR);
        voice.note_on(60, 1.0);
        voice.process(0.0);
        voice.kill();
        assert!(!voice.is_active());
        assert_eq!(voice.amp_envelope().output(), 0.0);
        assert_eq!(voice.process(0.0), 0.0);
    }

    #[test]
    fn test_cutoff_modulation_and_clamp() {
        let mut voice = Voice::new(SR);
        voice.set_filter_env_depth(0.0);
        voice.set_filter_cutoff(2000.0);
        voice.note_on(60, 1.0);
        voice.process(0.5);
        assert!((voice.current_cutoff() - 2500.0).abs() < 1e-9);
        voice.process(-10.0);
        assert_eq!(voice.current_cutoff(), MIN_CUTOFF);
    }

    #[test]
    fn test_velocity_scales_output() {
        let mut loud = Voice::with_seed(SR, 1);
        let mut quiet = Voice::with_seed(SR, 1);
        loud.note_on(57, 1.0);
        quiet.note_on(57, 0.5);
        for _ in 0..500 {
            let a = loud.process(0.0);
            let b = quiet.process(0.0);
            assert!((a * 0.5 - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_osc2_waveform_only_touches_osc2() {
        let mut voice = Voice::new(SR);
        voice.set_osc2_waveform(Waveform::Square);
        assert_eq!(voice.osc1().mix(), WaveMix::solo(Waveform::Saw));
        assert_eq!(voice.osc2().mix(), WaveMix::solo(Waveform::Square));
        voice.set_osc1_waveform(Waveform::Sine);
        assert_eq!(voice.osc2().mix(), WaveMix::solo(Waveform::Sine));
    }

    #[test]
    fn test_wave_weight_updates_both_oscillators() {
        let mut voice = Voice::new(SR);
        voice.set_wave_weight(Waveform::Noise, 0.25);
        let expected = WaveMix::new(0.0, 0.0, 1.0, 0.0, 0.25);
        assert_eq!(voice.osc1().mix(), expected);
        assert_eq!(voice.osc2().mix(), expected);
    }

    #[test]
    fn test_steal_fades_then_retriggers() {
        let mut voice = Voice::new(SR);
        voice.set_amp_envelope(EnvelopeParams::new(0.001, 0.1, 1.0, 0.3));
        voice.note_on(60, 1.0);
        for _ in 0..1000 {
            voice.process(0.0);
        }

        voice.steal(72, 0.9, 64);
        assert!(voice.is_fading());
        assert_eq!(voice.note(), 60);
        assert_eq!(voice.pending_note(), Some(72));

        for _ in 0..63 {
            voice.process(0.0);
            assert_eq!(voice.note(), 60);
        }
        voice.process(0.0);
        assert!(!voice.is_fading());
        assert_eq!(voice.note(), 72);
        assert_eq!(voice.velocity(), 0.9);
        assert!(voice.is_active());
    }

    #[test]
    fn test_steal_of_silent_voice_is_immediate() {
        let mut voice = Voice::new(SR);
        voice.steal(64, 1.0, 64);
        assert!(!voice.is_fading());
        assert_eq!(voice.note(), 64);
        assert!(voice.is_active());
    }

    #[test]
    fn test_released_pending_note_starts_in_release() {
        let mut voice = Voice::new(SR);
        voice.note_on(60, 1.0);
        voice.process(0.0);
        voice.steal(62, 1.0, 4);
        voice.release_pending(62);
        for _ in 0..4 {
            voice.process(0.0);
        }
        assert_eq!(voice.note(), 62);
        assert_eq!(voice.amp_envelope().state(), EnvelopeState::Release);
    }

    #[test]
    fn test_ladder_kind_runs() {
        let mut voice = Voice::new(SR);
        voice.set_filter_kind(FilterKind::Ladder);
        voice.set_filter_resonance(1.0);
        assert_eq!(voice.filter_resonance(), 1.0);
        voice.note_on(48, 1.0);
        for _ in 0..4800 {
            let s = voice.process(0.2);
            assert!(s.is_finite() && s.abs() <= 1.0);
        }
    }
}
