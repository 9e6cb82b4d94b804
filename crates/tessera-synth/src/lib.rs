//! Tessera Synth - Synthesis engine for the tessera synthesizer
//!
//! Oscillators, envelopes, voices and the polyphonic engine, built on the
//! primitives in `tessera-core`.
//!
//! # Core Components
//!
//! ## Oscillators
//!
//! - [`Oscillator`] / [`Waveform`] - Single-waveform PolyBLEP oscillator
//! - [`BlendOscillator`] / [`WaveMix`] - Five waveforms from one phase, mixed by weight
//! - [`DigitalEngine`] / [`DigitalMode`] - Phase modulation, wave morph and noise layer
//!
//! ```rust
//! use tessera_synth::{BlendOscillator, WaveMix};
//!
//! let mut osc = BlendOscillator::new(48000.0);
//! osc.set_frequency(110.0);
//! osc.set_mix(WaveMix::new(0.0, 0.0, 0.6, 0.4, 0.0));
//! let sample = osc.process();
//! ```
//!
//! ## Envelopes
//!
//! - [`Adsr`] - Exponential ADSR with overshoot attack
//! - [`EnvelopeState`] - Stage tracking
//!
//! ## Voices and Engine
//!
//! - [`Voice`] - Two detuned oscillators, filter, amp and filter envelopes
//! - [`SynthEngine`] - Fixed voice pool with first-free allocation and slot-0 stealing
//! - [`StealPolicy`] - Hard restart or short fade when stealing
//!
//! ## Presets and Commands
//!
//! - [`PRESETS`] - Ten factory presets, loaded with [`SynthEngine::load_preset`]
//! - [`Command`] - `Copy` control messages applied with [`SynthEngine::apply`]
//!
//! # Example: Play a Chord
//!
//! ```rust
//! use tessera_synth::SynthEngine;
//!
//! let mut engine: SynthEngine = SynthEngine::new(48000.0);
//! engine.load_preset(3); // Pad
//!
//! engine.note_on(60, 0.8); // C4
//! engine.note_on(64, 0.8); // E4
//! engine.note_on(67, 0.8); // G4
//!
//! let mut left = vec![0.0; 512];
//! let mut right = vec![0.0; 512];
//! engine.process_block_stereo(&mut left, &mut right);
//! assert_eq!(left, right);
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! tessera-synth = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod blend;
pub mod command;
pub mod digital;
pub mod engine;
pub mod envelope;
pub mod oscillator;
pub mod preset;
pub mod voice;

pub use blend::{BlendOscillator, WaveMix};
pub use command::{Command, EffectSlot};
pub use digital::{DigitalEngine, DigitalMode};
pub use engine::{DEFAULT_VOICES, STEAL_FADE_SAMPLES, StealPolicy, SynthEngine};
pub use envelope::{Adsr, AdsrParam, EnvelopeParams, EnvelopeState};
pub use oscillator::{Oscillator, Waveform};
pub use preset::{PRESET_COUNT, PRESETS, Preset, preset, preset_name};
pub use voice::{FilterKind, Voice};

// Re-export the core types that appear in this crate's API
pub use tessera_core::{FilterMode, Lfo, LfoShape};
