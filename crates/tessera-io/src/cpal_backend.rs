//! cpal-based audio backend.
//!
//! Wraps [cpal](https://crates.io/crates/cpal) for ALSA, CoreAudio and WASAPI
//! output. Only `f32` streams are built; devices that cannot open an `f32`
//! stream at the requested rate report an error so the caller can fall back.
//!
//! ```rust,ignore
//! use tessera_io::{AudioBackend, BackendStreamConfig, CpalBackend};
//!
//! let backend = CpalBackend::new();
//! let stream = backend.build_output_stream(
//!     &BackendStreamConfig::default(),
//!     Box::new(|buffer: &mut [f32]| buffer.fill(0.0)),
//!     Box::new(|err| eprintln!("Audio error: {}", err)),
//! )?;
//! // Plays until `stream` is dropped.
//! ```

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Host, SampleFormat};

use crate::backend::{
    AudioBackend, BackendStreamConfig, ErrorCallback, OutputCallback, StreamHandle,
};
use crate::device::{describe, device_name, list_output_devices};
use crate::{AudioDevice, Error, Result};

/// cpal-based audio backend on the platform's default host.
pub struct CpalBackend {
    host: Host,
}

impl CpalBackend {
    /// Create a backend on the platform's default audio host.
    pub fn new() -> Self {
        let host = cpal::default_host();
        tracing::info!(host = host.id().name(), "cpal backend initialized");
        Self { host }
    }

    /// Find an output device whose name contains `name` (case-insensitive), or
    /// the default device when `name` is `None`.
    fn find_output_device(&self, name: Option<&str>) -> Result<cpal::Device> {
        match name {
            Some(search) => {
                let search_lower = search.to_lowercase();
                let devices = self
                    .host
                    .output_devices()
                    .map_err(|e| Error::Stream(e.to_string()))?;

                for device in devices {
                    if let Ok(dev_name) = device_name(&device)
                        && dev_name.to_lowercase().contains(search_lower.as_str())
                    {
                        return Ok(device);
                    }
                }
                Err(Error::DeviceNotFound(format!(
                    "no output device matching '{}'",
                    search
                )))
            }
            None => self.host.default_output_device().ok_or(Error::NoDevice),
        }
    }

    /// Check that `device` offers an `f32` configuration at the requested
    /// rate and channel count.
    fn check_format(device: &cpal::Device, config: &BackendStreamConfig) -> Result<()> {
        let configs = device
            .supported_output_configs()
            .map_err(|e| Error::Stream(e.to_string()))?;
        let mut rate_ok = false;
        for range in configs {
            if range.channels() != config.channels
                || !(range.min_sample_rate()..=range.max_sample_rate()).contains(&config.sample_rate)
            {
                continue;
            }
            rate_ok = true;
            if range.sample_format() == SampleFormat::F32 {
                return Ok(());
            }
        }
        if rate_ok {
            Err(Error::UnsupportedFormat(format!(
                "no f32 output at {} Hz",
                config.sample_rate
            )))
        } else {
            Err(Error::Stream(format!(
                "{} Hz with {} channels not supported",
                config.sample_rate, config.channels
            )))
        }
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for CpalBackend {
    fn name(&self) -> &'static str {
        "cpal"
    }

    fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        list_output_devices(&self.host)
    }

    fn default_output_device(&self) -> Result<Option<AudioDevice>> {
        Ok(self.host.default_output_device().and_then(|d| {
            let name = device_name(&d).ok();
            describe(&d, name.as_deref())
        }))
    }

    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        mut callback: OutputCallback,
        mut error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        let device = self.find_output_device(config.device_name.as_deref())?;
        Self::check_format(&device, config)?;

        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(config.buffer_size),
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    callback(data);
                },
                move |err| {
                    error_callback(&err.to_string());
                },
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            channels = config.channels,
            sample_rate = config.sample_rate,
            buffer_size = config.buffer_size,
            "output stream started"
        );

        Ok(StreamHandle::new(stream))
    }
}
