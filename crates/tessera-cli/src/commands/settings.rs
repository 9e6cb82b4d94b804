//! Effective settings command, plus the settings flags shared with `play`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::settings::{Settings, StealSetting};

/// Settings file and the flags that override it.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Settings file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Output device (partial name match)
    #[arg(short, long)]
    pub device: Option<String>,

    /// Sample rates to try, in order (e.g. "192000,48000")
    #[arg(long = "rates", value_delimiter = ',')]
    pub sample_rates: Vec<u32>,

    /// Buffer size in frames
    #[arg(short, long)]
    pub buffer_size: Option<u32>,

    /// Preset loaded at start (0-9)
    #[arg(short, long)]
    pub preset: Option<usize>,

    /// Starting octave (1-7)
    #[arg(long)]
    pub octave: Option<u8>,

    /// Voice stealing policy
    #[arg(long, value_enum)]
    pub steal: Option<StealSetting>,

    /// Noise seed
    #[arg(long)]
    pub seed: Option<u32>,
}

impl SettingsArgs {
    /// Load the file (or defaults), apply the flags, and validate.
    pub fn resolve(&self) -> anyhow::Result<Settings> {
        let mut settings = Settings::load_or_default(self.settings.as_deref())
            .context("could not load settings")?;

        if let Some(device) = &self.device {
            settings.audio.device = Some(device.clone());
        }
        if !self.sample_rates.is_empty() {
            settings.audio.sample_rates.clone_from(&self.sample_rates);
        }
        if let Some(buffer_size) = self.buffer_size {
            settings.audio.buffer_size = buffer_size;
        }
        if let Some(preset) = self.preset {
            settings.engine.preset = preset;
        }
        if let Some(octave) = self.octave {
            settings.keyboard.octave = octave;
        }
        if let Some(steal) = self.steal {
            settings.engine.steal = steal;
        }
        if let Some(seed) = self.seed {
            settings.engine.seed = seed;
        }

        settings.validate().context("invalid settings")?;
        Ok(settings)
    }
}

pub fn run(args: SettingsArgs) -> anyhow::Result<()> {
    let settings = args.resolve()?;
    print!("{}", settings.to_toml()?);
    Ok(())
}
