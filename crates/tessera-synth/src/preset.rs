//! Factory preset table.
//!
//! Presets are plain compiled-in data. Loading one bulk-assigns its sound
//! parameters to every voice and sets the master volume; LFO settings are
//! left alone.

use crate::blend::WaveMix;
use crate::envelope::EnvelopeParams;

/// A named bundle of sound parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    /// Display name.
    pub name: &'static str,
    /// Wave mix applied to both oscillators.
    pub wave_mix: WaveMix,
    /// Base filter cutoff in Hz.
    pub cutoff: f64,
    /// Filter resonance.
    pub resonance: f64,
    /// Filter pre-drive.
    pub drive: f64,
    /// Amplitude envelope.
    pub amp_env: EnvelopeParams,
    /// Filter envelope.
    pub filter_env: EnvelopeParams,
    /// Filter-envelope depth.
    pub env_depth: f64,
    /// Master volume.
    pub master_volume: f64,
}

impl Preset {
    /// A preset with the factory base values: pure saw, 2000 Hz, resonance 0.3.
    pub const BASE: Preset = Preset {
        name: "Init",
        wave_mix: WaveMix::new(0.0, 0.0, 1.0, 0.0, 0.0),
        cutoff: 2000.0,
        resonance: 0.3,
        drive: 0.0,
        amp_env: EnvelopeParams::new(0.01, 0.1, 0.7, 0.3),
        filter_env: DEFAULT_FILTER_ENV,
        env_depth: 0.5,
        master_volume: 0.8,
    };
}

impl Default for Preset {
    fn default() -> Self {
        PRESETS[0]
    }
}

const DEFAULT_FILTER_ENV: EnvelopeParams = EnvelopeParams::new(0.01, 0.1, 0.3, 0.3);

/// Number of factory presets.
pub const PRESET_COUNT: usize = 10;

/// Factory presets, indexed by preset number.
pub static PRESETS: [Preset; PRESET_COUNT] = [
    Preset {
        name: "Init",
        wave_mix: WaveMix::new(1.0, 0.0, 0.0, 0.0, 0.0),
        env_depth: 0.3,
        ..Preset::BASE
    },
    Preset {
        name: "Bass",
        wave_mix: WaveMix::new(0.3, 0.0, 0.7, 0.0, 0.0),
        cutoff: 400.0,
        resonance: 0.5,
        drive: 0.2,
        amp_env: EnvelopeParams::new(0.01, 0.3, 0.8, 0.2),
        filter_env: EnvelopeParams::new(0.01, 0.2, 0.2, 0.3),
        env_depth: 0.6,
        ..Preset::BASE
    },
    Preset {
        name: "Lead",
        wave_mix: WaveMix::new(0.0, 0.0, 0.6, 0.4, 0.0),
        cutoff: 3000.0,
        resonance: 0.4,
        amp_env: EnvelopeParams::new(0.01, 0.1, 0.6, 0.4),
        filter_env: EnvelopeParams::new(0.01, 0.15, 0.4, 0.3),
        env_depth: 0.5,
        ..Preset::BASE
    },
    Preset {
        name: "Pad",
        wave_mix: WaveMix::new(0.5, 0.5, 0.0, 0.0, 0.0),
        cutoff: 1500.0,
        resonance: 0.2,
        amp_env: EnvelopeParams::new(0.5, 0.3, 0.8, 1.0),
        filter_env: EnvelopeParams::new(0.4, 0.3, 0.5, 0.3),
        env_depth: 0.3,
        ..Preset::BASE
    },
    Preset {
        name: "Kick",
        wave_mix: WaveMix::new(1.0, 0.0, 0.0, 0.0, 0.0),
        cutoff: 200.0,
        resonance: 0.8,
        drive: 0.3,
        amp_env: EnvelopeParams::new(0.001, 0.2, 0.0, 0.1),
        filter_env: EnvelopeParams::new(0.001, 0.15, 0.0, 0.3),
        env_depth: 0.9,
        master_volume: 1.0,
        ..Preset::BASE
    },
    Preset {
        name: "Snare",
        wave_mix: WaveMix::new(0.3, 0.2, 0.2, 0.0, 0.3),
        cutoff: 5000.0,
        resonance: 0.3,
        amp_env: EnvelopeParams::new(0.001, 0.15, 0.1, 0.15),
        filter_env: EnvelopeParams::new(0.001, 0.1, 0.2, 0.3),
        env_depth: 0.5,
        master_volume: 0.9,
        ..Preset::BASE
    },
    Preset {
        name: "Hi-Hat",
        wave_mix: WaveMix::new(0.0, 0.0, 0.3, 0.3, 0.4),
        cutoff: 10000.0,
        resonance: 0.2,
        amp_env: EnvelopeParams::new(0.001, 0.05, 0.0, 0.05),
        env_depth: 0.1,
        master_volume: 0.7,
        ..Preset::BASE
    },
    Preset {
        name: "Pluck",
        wave_mix: WaveMix::new(0.0, 0.3, 0.7, 0.0, 0.0),
        cutoff: 5000.0,
        resonance: 0.3,
        amp_env: EnvelopeParams::new(0.001, 0.3, 0.0, 0.2),
        filter_env: EnvelopeParams::new(0.001, 0.2, 0.1, 0.3),
        env_depth: 0.7,
        ..Preset::BASE
    },
    Preset {
        name: "Strings",
        wave_mix: WaveMix::new(0.0, 0.0, 1.0, 0.0, 0.0),
        cutoff: 2500.0,
        resonance: 0.2,
        amp_env: EnvelopeParams::new(0.3, 0.2, 0.7, 0.5),
        filter_env: EnvelopeParams::new(0.2, 0.2, 0.5, 0.3),
        env_depth: 0.2,
        ..Preset::BASE
    },
    Preset {
        name: "FM Bell",
        wave_mix: WaveMix::new(1.0, 0.0, 0.0, 0.0, 0.0),
        cutoff: 8000.0,
        resonance: 0.1,
        amp_env: EnvelopeParams::new(0.001, 1.5, 0.0, 1.0),
        env_depth: 0.1,
        ..Preset::BASE
    },
];

/// Look up a preset by index.
pub fn preset(index: usize) -> Option<&'static Preset> {
    PRESETS.get(index)
}

/// Preset name, or `"Unknown"` when `index` is out of range.
///
/// ```rust
/// use tessera_synth::preset_name;
///
/// assert_eq!(preset_name(6), "Hi-Hat");
/// assert_eq!(preset_name(42), "Unknown");
/// ```
pub fn preset_name(index: usize) -> &'static str {
    preset(index).map_or("Unknown", |p| p.name)
}
