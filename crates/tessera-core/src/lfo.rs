//! Low Frequency Oscillator for modulation.
//!
//! Drives the engine-wide cutoff modulation and the chorus delay sweep.

use libm::{pow, sin};

use crate::Rng;
use crate::math::TWO_PI;

/// Minimum LFO rate in Hz.
pub const MIN_RATE_HZ: f64 = 0.01;
/// Maximum LFO rate in Hz.
pub const MAX_RATE_HZ: f64 = 100.0;

/// LFO waveform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoShape {
    /// Sine.
    Sine,
    /// Symmetric triangle starting at -1.
    #[default]
    Triangle,
    /// Rising ramp from -1 to 1.
    SawUp,
    /// Falling ramp from 1 to -1.
    SawDown,
    /// +1 for the first half of the cycle, -1 for the second.
    Square,
    /// New random value on every phase wrap, held for the whole cycle.
    SampleAndHold,
}

impl LfoShape {
    /// All shapes in display order.
    pub const ALL: [LfoShape; 6] = [
        LfoShape::Sine,
        LfoShape::Triangle,
        LfoShape::SawUp,
        LfoShape::SawDown,
        LfoShape::Square,
        LfoShape::SampleAndHold,
    ];

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            LfoShape::Sine => "Sine",
            LfoShape::Triangle => "Triangle",
            LfoShape::SawUp => "Saw Up",
            LfoShape::SawDown => "Saw Down",
            LfoShape::Square => "Square",
            LfoShape::SampleAndHold => "S&H",
        }
    }

    #[inline]
    fn eval(self, phase: f64, held: f64) -> f64 {
        match self {
            LfoShape::Sine => sin(TWO_PI * phase),
            LfoShape::Triangle => {
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            }
            LfoShape::SawUp => 2.0 * phase - 1.0,
            LfoShape::SawDown => 1.0 - 2.0 * phase,
            LfoShape::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            LfoShape::SampleAndHold => held,
        }
    }
}

/// Free-running low-frequency oscillator.
///
/// The phase is advanced *before* the output is computed, so the first call
/// after [`sync`](Self::sync) evaluates the shape one increment past zero.
/// Sample-and-hold draws from the LFO's own [`Rng`] exactly when the advanced
/// phase is smaller than the previous one.
///
/// # Example
///
/// ```rust
/// use tessera_core::{Lfo, LfoShape};
///
/// let mut lfo = Lfo::new(48000.0);
/// lfo.set_rate(2.0);
/// lfo.set_shape(LfoShape::Sine);
///
/// let value = lfo.process();
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f64,
    phase_inc: f64,
    rate: f64,
    sample_rate: f64,
    shape: LfoShape,
    held: f64,
    rng: Rng,
}

impl Lfo {
    /// Create an LFO at 1 Hz, triangle shape.
    pub fn new(sample_rate: f64) -> Self {
        Self::with_seed(sample_rate, 0)
    }

    /// Create an LFO whose sample-and-hold sequence is derived from `seed`.
    pub fn with_seed(sample_rate: f64, seed: u32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: 1.0 / sample_rate,
            rate: 1.0,
            sample_rate,
            shape: LfoShape::default(),
            held: 0.0,
            rng: Rng::new(seed),
        }
    }

    /// Set rate in Hz, clamped to [0.01, 100].
    pub fn set_rate(&mut self, hz: f64) {
        self.rate = hz.clamp(MIN_RATE_HZ, MAX_RATE_HZ);
        self.phase_inc = self.rate / self.sample_rate;
    }

    /// Set rate from a normalized control: `0.1 × 500^param` Hz.
    ///
    /// 0.0 → 0.1 Hz, 0.5 → ~2.24 Hz, 1.0 → 50 Hz.
    pub fn set_rate_normalized(&mut self, param: f64) {
        self.set_rate(0.1 * pow(500.0, param));
    }

    /// Current rate in Hz.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Set the waveform.
    pub fn set_shape(&mut self, shape: LfoShape) {
        self.shape = shape;
    }

    /// Current waveform.
    pub fn shape(&self) -> LfoShape {
        self.shape
    }

    /// Reset phase to zero (note-on sync).
    pub fn sync(&mut self) {
        self.phase = 0.0;
    }

    /// Current phase in [0, 1).
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Update the sample rate, keeping the rate in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.phase_inc = self.rate / sample_rate;
    }

    /// Advance one sample and return the bipolar output in [-1, 1].
    #[inline]
    pub fn process(&mut self) -> f64 {
        let prev = self.phase;
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        if self.shape == LfoShape::SampleAndHold && self.phase < prev {
            self.held = self.rng.next_bipolar();
        }

        self.shape.eval(self.phase, self.held)
    }

    /// Advance one sample and return the unipolar output in [0, 1].
    #[inline]
    pub fn process_unipolar(&mut self) -> f64 {
        (self.process() + 1.0) * 0.5
    }
}
