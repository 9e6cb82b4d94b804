//! Player settings file.
//!
//! An optional TOML file passed with `--settings`. Every table and field is
//! optional; anything missing takes the built-in default.
//!
//! ```toml
//! [audio]
//! sample_rates = [192000, 48000]
//! buffer_size = 512
//! device = "USB"
//!
//! [keyboard]
//! octave = 3
//! velocity = 0.8
//! auto_note_off_ms = 300
//!
//! [engine]
//! preset = 2
//! steal = "fast-release"
//! seed = 1
//! master_volume = 0.7
//!
//! [effects.delay]
//! enabled = true
//! time = 375.0
//! feedback = 0.4
//!
//! [effects.reverb]
//! enabled = false
//! ```
//!
//! Effect parameters are looked up by full or short name, ignoring case.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tessera_core::ParameterInfo;
use tessera_effects::EffectsChain;
use tessera_synth::{Command, EffectSlot, PRESET_COUNT, StealPolicy};
use thiserror::Error;

use crate::keyboard::{MAX_OCTAVE, MIN_OCTAVE};

/// Errors from loading or checking a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read the file
    #[error("failed to read settings '{path}': {source}")]
    Read {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("invalid value for '{field}': {reason}")]
    Invalid {
        /// Dotted field name.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An effect parameter name matches nothing
    #[error("unknown parameter '{param}' for effect '{effect}'")]
    UnknownEffectParam {
        /// Effect table name.
        effect: String,
        /// Parameter key as written.
        param: String,
    },
}

/// Steal policy as written in settings and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StealSetting {
    /// Hard restart of slot 0.
    #[default]
    FirstSlot,
    /// Short fade before restarting slot 0.
    FastRelease,
}

impl From<StealSetting> for StealPolicy {
    fn from(setting: StealSetting) -> Self {
        match setting {
            StealSetting::FirstSlot => StealPolicy::FirstSlot,
            StealSetting::FastRelease => StealPolicy::FastRelease,
        }
    }
}

/// Audio device settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Sample rates to try, in order.
    pub sample_rates: Vec<u32>,
    /// Buffer size in frames.
    pub buffer_size: u32,
    /// Output device name filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rates: tessera_io::PREFERRED_SAMPLE_RATES.to_vec(),
            buffer_size: 512,
            device: None,
        }
    }
}

/// Keyboard behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardSettings {
    /// Starting octave, 1..=7.
    pub octave: u8,
    /// Note-on velocity 0..1.
    pub velocity: f64,
    /// A held note is released after this many milliseconds.
    pub auto_note_off_ms: u64,
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            octave: 4,
            velocity: 0.8,
            auto_note_off_ms: 300,
        }
    }
}

/// Engine start-up state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Preset loaded at start.
    pub preset: usize,
    /// Voice stealing policy.
    pub steal: StealSetting,
    /// Noise seed.
    pub seed: u32,
    /// Master volume override; the preset's volume when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_volume: Option<f64>,
}

/// One effect slot: enable flag plus named parameter values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectSettings {
    /// `false` bypasses the slot.
    pub enabled: bool,
    /// Parameter values keyed by name.
    #[serde(flatten)]
    pub params: BTreeMap<String, f64>,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            params: BTreeMap::new(),
        }
    }
}

/// Settings for the three effect slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsSettings {
    /// Chorus slot.
    pub chorus: EffectSettings,
    /// Delay slot.
    pub delay: EffectSettings,
    /// Reverb slot.
    pub reverb: EffectSettings,
}

impl EffectsSettings {
    fn slot(&self, slot: EffectSlot) -> &EffectSettings {
        match slot {
            EffectSlot::Chorus => &self.chorus,
            EffectSlot::Delay => &self.delay,
            EffectSlot::Reverb => &self.reverb,
        }
    }
}

/// Complete player settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Audio device.
    pub audio: AudioSettings,
    /// Keyboard.
    pub keyboard: KeyboardSettings,
    /// Engine.
    pub engine: EngineSettings,
    /// Effects.
    pub effects: EffectsSettings,
}

impl Settings {
    /// Read and validate a settings file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = text.parse()?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Defaults, or the file at `path` when given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check ranges and effect parameter names.
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &str, reason: impl Into<String>) -> SettingsError {
            SettingsError::Invalid {
                field: field.to_string(),
                reason: reason.into(),
            }
        }

        if self.audio.sample_rates.is_empty() {
            return Err(invalid("audio.sample_rates", "at least one rate is required"));
        }
        if let Some(&rate) = self.audio.sample_rates.iter().find(|&&r| r == 0) {
            return Err(invalid("audio.sample_rates", format!("{rate} Hz is not a rate")));
        }
        if self.audio.buffer_size == 0 {
            return Err(invalid("audio.buffer_size", "must be positive"));
        }
        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&self.keyboard.octave) {
            return Err(invalid(
                "keyboard.octave",
                format!("must be in {MIN_OCTAVE}..={MAX_OCTAVE}"),
            ));
        }
        if !(0.0..=1.0).contains(&self.keyboard.velocity) {
            return Err(invalid("keyboard.velocity", "must be in 0..=1"));
        }
        if self.engine.preset >= PRESET_COUNT {
            return Err(invalid(
                "engine.preset",
                format!("must be below {PRESET_COUNT}"),
            ));
        }
        if let Some(volume) = self.engine.master_volume
            && !(0.0..=1.0).contains(&volume)
        {
            return Err(invalid("engine.master_volume", "must be in 0..=1"));
        }
        self.effect_commands().map(|_| ())
    }

    /// Commands that bring a fresh engine and chain to these settings.
    pub fn startup_commands(&self) -> Result<Vec<Command>, SettingsError> {
        let mut commands = vec![
            Command::LoadPreset(self.engine.preset),
            Command::SetStealPolicy(self.engine.steal.into()),
        ];
        if let Some(volume) = self.engine.master_volume {
            commands.push(Command::SetMasterVolume(volume));
        }
        commands.extend(self.effect_commands()?);
        Ok(commands)
    }

    fn effect_commands(&self) -> Result<Vec<Command>, SettingsError> {
        // Only descriptors are read; a low rate keeps the buffers small.
        let chain = EffectsChain::new(8000.0);
        let mut commands = Vec::new();
        for slot in EffectSlot::ALL {
            let effect = self.effects.slot(slot);
            let Some(info) = chain.slot(slot.index()) else {
                continue;
            };
            for (name, &value) in &effect.params {
                let index = info.find_param_by_name(name).ok_or_else(|| {
                    SettingsError::UnknownEffectParam {
                        effect: slot.id().to_string(),
                        param: name.clone(),
                    }
                })?;
                commands.push(Command::SetEffectParam { slot, index, value });
            }
            commands.push(Command::SetEffectEnabled {
                slot,
                enabled: effect.enabled,
            });
        }
        Ok(commands)
    }
}

impl std::str::FromStr for Settings {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let settings: Self = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }
}
