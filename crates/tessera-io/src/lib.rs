//! Audio output layer for the tessera synthesizer.
//!
//! This crate connects the DSP crates to a sound card:
//!
//! - **Backends**: the [`AudioBackend`] trait and its [`CpalBackend`]
//!   implementation, plus [`open_with_fallback`] for sample-rate negotiation
//! - **Control**: [`control_channel`], a bounded lock-free queue carrying
//!   [`Command`](tessera_synth::Command)s from the control thread to the
//!   audio thread
//! - **Rendering**: [`Renderer`], which owns the engine and effects chain and
//!   fills interleaved `f32` output buffers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tessera_io::{BackendStreamConfig, CpalBackend, Renderer, control_channel, open_with_fallback};
//! use tessera_synth::Command;
//!
//! let (tx, rx) = control_channel(tessera_io::CONTROL_QUEUE_CAPACITY);
//! let backend = CpalBackend::new();
//! let opened = open_with_fallback(&backend, &BackendStreamConfig::default(), &[192_000, 48_000], |rate| {
//!     let renderer: Renderer = Renderer::new(f64::from(rate), 0, rx.clone());
//!     (renderer.into_callback(), Box::new(|err: &str| eprintln!("{err}")))
//! })?;
//!
//! tx.send(Command::NoteOn { note: 60, velocity: 0.8 });
//! ```

pub mod backend;
pub mod control;
pub mod cpal_backend;
mod device;
pub mod renderer;

pub use backend::{
    AudioBackend, BackendStreamConfig, ErrorCallback, OpenedStream, OutputCallback, StreamHandle,
    open_with_fallback,
};
pub use control::{CONTROL_QUEUE_CAPACITY, ControlReceiver, ControlSender, control_channel};
pub use cpal_backend::CpalBackend;
pub use device::AudioDevice;
pub use renderer::Renderer;

/// Sample rates tried in order when opening the output stream.
pub const PREFERRED_SAMPLE_RATES: [u32; 2] = [192_000, 48_000];

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Every candidate sample rate was refused.
    #[error("No usable sample rate (tried {requested:?})")]
    SampleRateUnavailable {
        /// Rates attempted, in order.
        requested: Vec<u32>,
    },
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
