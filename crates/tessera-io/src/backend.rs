//! Pluggable audio backend abstraction.
//!
//! [`AudioBackend`] keeps the renderer independent of the platform audio API.
//! [`CpalBackend`](crate::CpalBackend) is the only production implementation;
//! tests drive [`open_with_fallback`] with a scripted backend.
//!
//! ```text
//! ┌──────────────────────┐   OutputCallback   ┌──────────────┐
//! │ Renderer (engine+fx) │ ─────────────────▶ │ AudioBackend │ ──▶ device
//! └──────────────────────┘                    └──────────────┘
//! ```
//!
//! Callbacks are boxed closures so the trait stays object-safe. Streams come
//! back as a type-erased [`StreamHandle`] that stops playback on drop.

use crate::{AudioDevice, Error, Result};

/// Configuration for building an output stream.
///
/// Defaults to 192 kHz, 512-frame buffers, stereo, system default device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendStreamConfig {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Preferred buffer size in frames.
    pub buffer_size: u32,
    /// Number of output channels.
    pub channels: u16,
    /// Device name filter (system default if `None`).
    pub device_name: Option<String>,
}

impl Default for BackendStreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 192_000,
            buffer_size: 512,
            channels: 2,
            device_name: None,
        }
    }
}

/// Type-erased audio stream handle.
///
/// The stream plays while this handle exists; dropping it stops playback.
pub struct StreamHandle {
    _inner: Box<dyn Send>,
}

impl StreamHandle {
    /// Wrap a backend-specific stream object.
    pub fn new<T: Send + 'static>(stream: T) -> Self {
        Self {
            _inner: Box::new(stream),
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Output callback, run on the real-time audio thread.
///
/// Receives interleaved `f32` samples (`[L0, R0, L1, R1, ...]`) to fill. It
/// must not allocate, lock or perform I/O.
pub type OutputCallback = Box<dyn FnMut(&mut [f32]) + Send>;

/// Called with a human-readable message when the stream reports an error.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// Platform audio output.
pub trait AudioBackend: Send {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// List output devices.
    fn list_devices(&self) -> Result<Vec<AudioDevice>>;

    /// The default output device, if any.
    fn default_output_device(&self) -> Result<Option<AudioDevice>>;

    /// Build and start an output stream with exactly `config`.
    ///
    /// Fails rather than silently substituting another sample rate.
    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        callback: OutputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;
}

/// A running stream and the rate it was opened at.
#[derive(Debug)]
pub struct OpenedStream {
    /// Keeps the stream alive.
    pub handle: StreamHandle,
    /// Negotiated sample rate in Hz.
    pub sample_rate: u32,
}

/// Open an output stream, trying each of `rates` in order.
///
/// `make_callbacks` is called once per attempt with the candidate rate, so the
/// renderer can be built for the rate actually in use. A missing device ends
/// the search immediately; any other failure moves on to the next rate.
///
/// # Errors
///
/// [`Error::SampleRateUnavailable`] when every rate fails, or the device error
/// when no device matches.
pub fn open_with_fallback<F>(
    backend: &dyn AudioBackend,
    base: &BackendStreamConfig,
    rates: &[u32],
    mut make_callbacks: F,
) -> Result<OpenedStream>
where
    F: FnMut(u32) -> (OutputCallback, ErrorCallback),
{
    for &rate in rates {
        let config = BackendStreamConfig {
            sample_rate: rate,
            ..base.clone()
        };
        let (callback, error_callback) = make_callbacks(rate);
        match backend.build_output_stream(&config, callback, error_callback) {
            Ok(handle) => {
                tracing::info!(
                    backend = backend.name(),
                    sample_rate = rate,
                    buffer_size = config.buffer_size,
                    "output stream opened"
                );
                return Ok(OpenedStream {
                    handle,
                    sample_rate: rate,
                });
            }
            Err(e @ (Error::NoDevice | Error::DeviceNotFound(_))) => return Err(e),
            Err(e) => {
                tracing::warn!(sample_rate = rate, error = %e, "sample rate refused, trying next");
            }
        }
    }
    Err(Error::SampleRateUnavailable {
        requested: rates.to_vec(),
    })
}
