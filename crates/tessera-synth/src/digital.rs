//! Secondary digital engine.
//!
//! A character layer alongside the analog-style oscillator pair: two-operator
//! phase modulation, a sine-to-saw morph, or raw digital noise.

use libm::{fmod, sin};
use tessera_core::{Rng, TWO_PI};

/// Maximum modulation index reached by [`DigitalEngine::set_mod_index`].
pub const MAX_MOD_INDEX: f64 = 8.0;
/// Maximum modulator ratio reached by [`DigitalEngine::set_ratio`].
pub const MAX_RATIO: f64 = 8.0;

/// Digital engine algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DigitalMode {
    /// Carrier phase offset by `mod_index × sin(2π × ((phase × ratio) mod 1))`.
    #[default]
    PhaseMod,
    /// Linear crossfade from sine (shape 0) to naive saw (shape 1).
    Waves,
    /// Uniform white noise.
    Noise,
}

impl DigitalMode {
    /// All modes in display order.
    pub const ALL: [DigitalMode; 3] = [DigitalMode::PhaseMod, DigitalMode::Waves, DigitalMode::Noise];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            DigitalMode::PhaseMod => "Phase Mod",
            DigitalMode::Waves => "Waves",
            DigitalMode::Noise => "Noise",
        }
    }
}

/// Phase-modulation / wave-morph / noise oscillator.
///
/// ## Parameters
/// - `mod_index`: normalized 0..1 mapped to 0..8 (raw default 1.0)
/// - `ratio`: normalized 0..1 mapped to 1..8 (raw default 1.0)
/// - `shape`: 0..1 (default 0.5)
///
/// # Example
///
/// ```rust
/// use tessera_synth::{DigitalEngine, DigitalMode};
///
/// let mut engine = DigitalEngine::new(48000.0);
/// engine.set_frequency(220.0);
/// engine.set_mode(DigitalMode::PhaseMod);
/// engine.set_mod_index(0.25); // index 2
/// engine.set_ratio(1.0 / 7.0); // ratio 2
/// assert!(engine.process().abs() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DigitalEngine {
    phase: f64,
    phase_inc: f64,
    frequency: f64,
    sample_rate: f64,
    mode: DigitalMode,
    mod_index: f64,
    ratio: f64,
    shape: f64,
    rng: Rng,
}

impl Default for DigitalEngine {
    fn default() -> Self {
        Self::new(tessera_core::NATIVE_SAMPLE_RATE)
    }
}

impl DigitalEngine {
    /// Create an engine in phase-mod mode.
    pub fn new(sample_rate: f64) -> Self {
        Self::with_seed(sample_rate, 0)
    }

    /// Create an engine whose noise generator starts from `seed`.
    pub fn with_seed(sample_rate: f64, seed: u32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: 0.0,
            frequency: 0.0,
            sample_rate,
            mode: DigitalMode::default(),
            mod_index: 1.0,
            ratio: 1.0,
            shape: 0.5,
            rng: Rng::new(seed),
        }
    }

    /// Set carrier frequency in Hz, clamped to [0, Nyquist].
    pub fn set_frequency(&mut self, freq: f64) {
        self.frequency = freq.clamp(0.0, self.sample_rate * 0.5);
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Carrier frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Select the algorithm.
    pub fn set_mode(&mut self, mode: DigitalMode) {
        self.mode = mode;
    }

    /// Current algorithm.
    pub fn mode(&self) -> DigitalMode {
        self.mode
    }

    /// Set modulation depth from a 0..1 control (maps to 0..8).
    pub fn set_mod_index(&mut self, amount: f64) {
        self.mod_index = amount.clamp(0.0, 1.0) * MAX_MOD_INDEX;
    }

    /// Modulation index in radians.
    pub fn mod_index(&self) -> f64 {
        self.mod_index
    }

    /// Set modulator ratio from a 0..1 control (maps to 1..8).
    pub fn set_ratio(&mut self, amount: f64) {
        self.ratio = 1.0 + amount.clamp(0.0, 1.0) * (MAX_RATIO - 1.0);
    }

    /// Modulator-to-carrier frequency ratio.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Set the sine/saw morph position, clamped to [0, 1].
    pub fn set_shape(&mut self, shape: f64) {
        self.shape = shape.clamp(0.0, 1.0);
    }

    /// Morph position.
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Set sample rate and recalculate the phase increment.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.set_frequency(self.frequency);
    }

    /// Reset phase to 0.
    pub fn sync(&mut self) {
        self.phase = 0.0;
    }

    /// Current phase in [0, 1).
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Generate the next sample.
    #[inline]
    pub fn process(&mut self) -> f64 {
        let p = self.phase;
        let out = match self.mode {
            DigitalMode::PhaseMod => {
                let modulator = sin(TWO_PI * fmod(p * self.ratio, 1.0));
                sin(TWO_PI * p + self.mod_index * modulator)
            }
            DigitalMode::Waves => {
                let saw = 2.0 * p - 1.0;
                sin(TWO_PI * p) * (1.0 - self.shape) + saw * self.shape
            }
            DigitalMode::Noise => self.rng.next_bipolar(),
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }
}
