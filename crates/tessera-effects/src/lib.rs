//! Tessera Effects - the post-voice effects chain
//!
//! The synth engine produces a mono sum duplicated to both channels; these
//! effects add the stereo image:
//!
//! - [`Chorus`] - Two sine-modulated delay lines, right LFO detuned ×1.1
//! - [`Delay`] - Feedback delay, up to two seconds
//! - [`Reverb`] - Schroeder network of four combs and two allpasses
//! - [`EffectsChain`] - Chorus → Delay → Reverb with per-slot bypass
//!
//! Every effect implements [`tessera_core::Effect`] and
//! [`tessera_core::ParameterInfo`]. With its mix at 0 each effect returns its
//! input unchanged.
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::Effect;
//! use tessera_effects::EffectsChain;
//!
//! let mut chain = EffectsChain::new(48000.0);
//! chain.delay_mut().set_time_ms(375.0);
//! chain.reverb_mut().set_decay(0.8);
//!
//! let mut left = [0.5; 64];
//! let mut right = [0.5; 64];
//! chain.process_block_stereo(&mut left, &mut right);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod chain;
pub mod chorus;
pub mod delay;
pub mod reverb;

pub use chain::{EffectsChain, SLOT_COUNT, SLOT_IDS};
pub use chorus::Chorus;
pub use delay::Delay;
pub use reverb::Reverb;
