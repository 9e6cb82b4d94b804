//! Control-thread copy of the synth parameters the keyboard can change.
//!
//! The audio thread owns the real engine; the player only sends commands.
//! [`ParamMirror`] tracks what was sent so relative nudges have a base value
//! and the status line has something to show.

use tessera_synth::{AdsrParam, Command, EnvelopeParams, PRESET_COUNT, PRESETS, WaveMix};

use crate::keyboard::{self, Action};

/// What the player should do after [`ParamMirror::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Play this MIDI note through the note tracker.
    Play(u8),
    /// Send these commands and show the status line.
    Send(Vec<Command>, String),
    /// Only the status line changed.
    Status(String),
    /// Release everything and forget the held note.
    AllOff,
    /// Leave the player.
    Quit,
}

/// Display-side mirror of the keyboard-controlled parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamMirror {
    /// Loaded preset index.
    pub preset: usize,
    /// Wave-mix weights.
    pub wave_mix: WaveMix,
    /// Filter cutoff in Hz.
    pub cutoff: f64,
    /// Filter resonance.
    pub resonance: f64,
    /// Amplitude envelope.
    pub amp_env: EnvelopeParams,
    /// Keyboard octave.
    pub octave: u8,
}

impl ParamMirror {
    /// Mirror of preset `preset` (wrapped into range) at `octave`.
    pub fn new(preset: usize, octave: u8) -> Self {
        let mut mirror = Self {
            preset: 0,
            wave_mix: WaveMix::default(),
            cutoff: 0.0,
            resonance: 0.0,
            amp_env: EnvelopeParams::default(),
            octave: octave.clamp(keyboard::MIN_OCTAVE, keyboard::MAX_OCTAVE),
        };
        mirror.load(preset % PRESET_COUNT);
        mirror
    }

    /// Name of the loaded preset.
    pub fn preset_name(&self) -> &'static str {
        PRESETS[self.preset].name
    }

    fn load(&mut self, index: usize) {
        let p = &PRESETS[index];
        self.preset = index;
        self.wave_mix = p.wave_mix;
        self.cutoff = p.cutoff;
        self.resonance = p.resonance;
        self.amp_env = p.amp_env;
    }

    fn load_outcome(&mut self, index: usize) -> Outcome {
        self.load(index);
        tracing::debug!(preset = index, name = self.preset_name(), "preset change");
        Outcome::Send(
            vec![Command::LoadPreset(index), Command::ClearEffects],
            format!("Preset: {}", self.preset_name()),
        )
    }

    fn amp_stage(&mut self, param: AdsrParam, value: f64) -> Outcome {
        let status = match param {
            AdsrParam::Attack => {
                self.amp_env.attack = value;
                format!("Attack: {:.0} ms", value * 1000.0)
            }
            AdsrParam::Decay => {
                self.amp_env.decay = value;
                format!("Decay: {:.0} ms", value * 1000.0)
            }
            AdsrParam::Sustain => {
                self.amp_env.sustain = value;
                format!("Sustain: {:.0}%", value * 100.0)
            }
            AdsrParam::Release => {
                self.amp_env.release = value;
                format!("Release: {:.0} ms", value * 1000.0)
            }
        };
        Outcome::Send(vec![Command::SetAmpStage { param, value }], status)
    }

    fn cutoff_outcome(&mut self, up: bool) -> Outcome {
        self.cutoff = keyboard::nudge_cutoff(self.cutoff, up);
        Outcome::Send(
            vec![Command::SetFilterCutoff(self.cutoff)],
            format!("Cutoff: {:.0} Hz", self.cutoff),
        )
    }

    fn resonance_outcome(&mut self, up: bool) -> Outcome {
        self.resonance = keyboard::nudge_resonance(self.resonance, up);
        Outcome::Send(
            vec![Command::SetFilterResonance(self.resonance)],
            format!("Resonance: {:.2}", self.resonance),
        )
    }

    /// Update the mirror for `action` and say what to send.
    pub fn apply(&mut self, action: Action) -> Outcome {
        let env = self.amp_env;
        match action {
            Action::Note(offset) => Outcome::Play(keyboard::note_for(self.octave, offset)),
            Action::OctaveDown | Action::OctaveUp => {
                self.octave = keyboard::step_octave(self.octave, action == Action::OctaveUp);
                Outcome::Status(format!("Octave: {}", self.octave))
            }
            Action::PrevPreset => self.load_outcome((self.preset + PRESET_COUNT - 1) % PRESET_COUNT),
            Action::NextPreset => self.load_outcome((self.preset + 1) % PRESET_COUNT),
            Action::ToggleWave(wave) => {
                let value = keyboard::toggle_weight(self.wave_mix.get(wave));
                self.wave_mix.set(wave, value);
                let state = if value > 0.5 { "on" } else { "off" };
                Outcome::Send(
                    vec![Command::SetWaveWeight { wave, value }],
                    format!("{}: {}", wave.name(), state),
                )
            }
            Action::CutoffDown => self.cutoff_outcome(false),
            Action::CutoffUp => self.cutoff_outcome(true),
            Action::ResonanceDown => self.resonance_outcome(false),
            Action::ResonanceUp => self.resonance_outcome(true),
            Action::AttackDown => {
                self.amp_stage(AdsrParam::Attack, keyboard::nudge_attack_decay(env.attack, false))
            }
            Action::AttackUp => {
                self.amp_stage(AdsrParam::Attack, keyboard::nudge_attack_decay(env.attack, true))
            }
            Action::DecayDown => {
                self.amp_stage(AdsrParam::Decay, keyboard::nudge_attack_decay(env.decay, false))
            }
            Action::DecayUp => {
                self.amp_stage(AdsrParam::Decay, keyboard::nudge_attack_decay(env.decay, true))
            }
            Action::SustainDown => {
                self.amp_stage(AdsrParam::Sustain, keyboard::nudge_sustain(env.sustain, false))
            }
            Action::SustainUp => {
                self.amp_stage(AdsrParam::Sustain, keyboard::nudge_sustain(env.sustain, true))
            }
            Action::ReleaseDown => {
                self.amp_stage(AdsrParam::Release, keyboard::nudge_release(env.release, false))
            }
            Action::ReleaseUp => {
                self.amp_stage(AdsrParam::Release, keyboard::nudge_release(env.release, true))
            }
            Action::AllNotesOff => Outcome::AllOff,
            Action::Quit => Outcome::Quit,
        }
    }
}
