//! Control commands.
//!
//! Every note and parameter change the control surface can make is expressed
//! as a [`Command`]. Commands are small `Copy` values so they can cross a
//! lock-free queue into the audio thread, which applies them between blocks.

use tessera_core::{FilterMode, LfoShape};

use crate::blend::WaveMix;
use crate::digital::DigitalMode;
use crate::engine::StealPolicy;
use crate::envelope::{AdsrParam, EnvelopeParams};
use crate::oscillator::Waveform;
use crate::voice::FilterKind;

/// Effect slot in the post-voice chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectSlot {
    /// Stereo chorus.
    Chorus,
    /// Feedback delay.
    Delay,
    /// Schroeder reverb.
    Reverb,
}

impl EffectSlot {
    /// Slots in processing order.
    pub const ALL: [EffectSlot; 3] = [EffectSlot::Chorus, EffectSlot::Delay, EffectSlot::Reverb];

    /// Position in the effects chain.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Slot for a lowercase identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id().eq_ignore_ascii_case(id))
    }

    /// Lowercase identifier, as used in settings files.
    pub fn id(self) -> &'static str {
        match self {
            EffectSlot::Chorus => "chorus",
            EffectSlot::Delay => "delay",
            EffectSlot::Reverb => "reverb",
        }
    }
}

/// A single control-thread → audio-thread message.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Start a note (velocity 0..1).
    NoteOn {
        /// MIDI note number.
        note: u8,
        /// Velocity 0..1.
        velocity: f64,
    },
    /// Release every voice holding `note`.
    NoteOff {
        /// MIDI note number.
        note: u8,
    },
    /// Release every voice.
    AllNotesOff,
    /// Load a factory preset; out-of-range indices are ignored.
    LoadPreset(usize),

    /// Replace the wave mix on every voice.
    SetWaveMix(WaveMix),
    /// Change one wave-mix weight on every voice.
    SetWaveWeight {
        /// Which weight.
        wave: Waveform,
        /// New weight 0..1.
        value: f64,
    },
    /// Single waveform on both oscillators.
    SetOsc1Waveform(Waveform),
    /// Single waveform on the second oscillator.
    SetOsc2Waveform(Waveform),
    /// Oscillator crossfade 0..1.
    SetOscMix(f64),

    /// Base cutoff in Hz.
    SetFilterCutoff(f64),
    /// Filter resonance.
    SetFilterResonance(f64),
    /// Filter pre-drive 0..1.
    SetFilterDrive(f64),
    /// Filter topology.
    SetFilterKind(FilterKind),
    /// State-variable filter output.
    SetFilterMode(FilterMode),
    /// Filter-envelope depth 0..1.
    SetFilterEnvDepth(f64),

    /// Full amplitude ADSR.
    SetAmpEnvelope(EnvelopeParams),
    /// One amplitude ADSR stage.
    SetAmpStage {
        /// Which stage parameter.
        param: AdsrParam,
        /// Seconds, or level for sustain.
        value: f64,
    },
    /// Full filter ADSR.
    SetFilterEnvelope(EnvelopeParams),
    /// One filter ADSR stage.
    SetFilterStage {
        /// Which stage parameter.
        param: AdsrParam,
        /// Seconds, or level for sustain.
        value: f64,
    },

    /// Digital engine crossfade 0..1.
    SetDigitalLevel(f64),
    /// Digital engine algorithm.
    SetDigitalMode(DigitalMode),
    /// Digital engine modulation index (0..1 control).
    SetDigitalModIndex(f64),
    /// Digital engine ratio (0..1 control).
    SetDigitalRatio(f64),
    /// Digital engine morph 0..1.
    SetDigitalShape(f64),

    /// LFO rate in Hz.
    SetLfoRate(f64),
    /// LFO rate from a 0..1 control.
    SetLfoRateNormalized(f64),
    /// LFO shape.
    SetLfoShape(LfoShape),
    /// LFO depth 0..1.
    SetLfoDepth(f64),
    /// Master volume 0..1.
    SetMasterVolume(f64),
    /// Voice stealing policy.
    SetStealPolicy(StealPolicy),

    /// Set an effect parameter by index.
    SetEffectParam {
        /// Target effect.
        slot: EffectSlot,
        /// Parameter index within the effect.
        index: usize,
        /// New value; the effect clamps it.
        value: f64,
    },
    /// Enable or bypass an effect.
    SetEffectEnabled {
        /// Target effect.
        slot: EffectSlot,
        /// `false` bypasses the effect.
        enabled: bool,
    },
    /// Zero every effect buffer.
    ClearEffects,
}

impl Command {
    /// True for commands addressed to the effects chain rather than the engine.
    pub fn is_effect(&self) -> bool {
        matches!(
            self,
            Command::SetEffectParam { .. } | Command::SetEffectEnabled { .. } | Command::ClearEffects
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_classification() {
        assert!(Command::ClearEffects.is_effect());
        assert!(
            Command::SetEffectParam {
                slot: EffectSlot::Reverb,
                index: 0,
                value: 0.2
            }
            .is_effect()
        );
        assert!(!Command::AllNotesOff.is_effect());
        assert!(!Command::SetMasterVolume(0.5).is_effect());
    }

    #[test]
    fn test_command_is_small() {
        assert!(core::mem::size_of::<Command>() <= 48);
    }

    #[test]
    fn test_slot_ids() {
        let ids: Vec<&str> = EffectSlot::ALL.iter().map(|s| s.id()).collect();
        assert_eq!(ids, ["chorus", "delay", "reverb"]);
        assert_eq!(EffectSlot::from_id("Delay"), Some(EffectSlot::Delay));
        assert_eq!(EffectSlot::Reverb.index(), 2);
    }
}
