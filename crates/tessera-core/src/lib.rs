//! Tessera Core - DSP primitives for the tessera synthesizer
//!
//! This crate provides the building blocks shared by the synthesis engine and
//! the effects chain. Everything here runs in the audio callback, so nothing
//! allocates, blocks, or performs I/O once constructed.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe stereo effect trait
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Index-based parameter discovery
//!
//! ## Filters
//!
//! - [`StateVariableFilter`] - Chamberlin 2-pole multimode filter (LP/HP/BP/notch)
//! - [`LadderFilter`] - 4-pole cascade with tanh stages and resonance feedback
//! - [`CombFilter`] / [`AllpassFilter`] - Schroeder reverb building blocks
//!
//! ## Delay Lines
//!
//! - [`DelayLine`] - Ring buffer with whole-sample and fractional reads
//!
//! ## Modulation
//!
//! - [`Lfo`] - Six-shape low-frequency oscillator with sample-and-hold
//!
//! ## Utilities
//!
//! - [`Rng`] - Seedable xorshift generator, one per oscillator instance
//! - [`rational_clip`], [`wet_dry_mix`], [`flush_denormal`]
//!
//! # Numeric Contract
//!
//! All signal math is `f64`. Every range clamp, update order and constant is
//! part of the public behavior so the arithmetic can be replaced sample for
//! sample by a fixed-point port.
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build for embedded targets:
//!
//! ```toml
//! [dependencies]
//! tessera-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod delay;
pub mod effect;
pub mod ladder;
pub mod lfo;
pub mod math;
pub mod param_info;
pub mod rng;
pub mod svf;

pub use allpass::AllpassFilter;
pub use comb::CombFilter;
pub use delay::DelayLine;
pub use effect::Effect;
pub use ladder::LadderFilter;
pub use lfo::{Lfo, LfoShape};
pub use math::{
    NATIVE_SAMPLE_RATE, TWO_PI, flush_denormal, midi_to_freq, ms_to_samples, rational_clip,
    wet_dry_mix,
};
pub use param_info::{ParamDescriptor, ParamUnit, ParameterInfo};
pub use rng::Rng;
pub use svf::{FilterMode, StateVariableFilter};
