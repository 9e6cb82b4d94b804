//! Output device enumeration.

use cpal::Device;
use cpal::traits::{DeviceTrait, HostTrait};

use crate::{Error, Result};

/// Fallback when a device reports no default configuration.
const UNKNOWN_RATE: u32 = 48000;

/// Audio output device information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Lowest and highest supported output rates, when the device reports them.
    pub rate_range: Option<(u32, u32)>,
    /// Whether this is the host's default output.
    pub is_default: bool,
}

impl AudioDevice {
    /// True when the device advertises `rate` in its supported range.
    pub fn supports_rate(&self, rate: u32) -> bool {
        self.rate_range
            .is_some_and(|(lo, hi)| (lo..=hi).contains(&rate))
    }
}

/// Human-readable name of a cpal device.
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

pub(crate) fn describe(device: &Device, default_name: Option<&str>) -> Option<AudioDevice> {
    let name = device_name(device).ok()?;
    let default_sample_rate = device
        .default_output_config()
        .map(|c| c.sample_rate())
        .unwrap_or(UNKNOWN_RATE);
    let rate_range = device.supported_output_configs().ok().and_then(|configs| {
        configs
            .map(|c| (c.min_sample_rate(), c.max_sample_rate()))
            .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
    });
    Some(AudioDevice {
        is_default: default_name == Some(name.as_str()),
        name,
        default_sample_rate,
        rate_range,
    })
}

/// List every output device on `host`.
pub(crate) fn list_output_devices(host: &cpal::Host) -> Result<Vec<AudioDevice>> {
    let default_name = host
        .default_output_device()
        .and_then(|d| device_name(&d).ok());
    let devices = host
        .output_devices()
        .map_err(|e| Error::Stream(e.to_string()))?;
    Ok(devices
        .filter_map(|d| describe(&d, default_name.as_deref()))
        .collect())
}
