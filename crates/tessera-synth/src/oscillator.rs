//! Audio-rate oscillators with anti-aliasing.
//!
//! Provides a single-waveform oscillator built on a phase accumulator, with
//! PolyBLEP (Polynomial Band-Limited Step) correction at the discontinuities
//! of the saw and square waves. The per-waveform generators are shared with
//! [`BlendOscillator`](crate::BlendOscillator).

use libm::{fmod, sin};
use tessera_core::{Rng, TWO_PI, midi_to_freq};

/// Lowest accepted pulse width.
pub const MIN_PULSE_WIDTH: f64 = 0.01;
/// Highest accepted pulse width.
pub const MAX_PULSE_WIDTH: f64 = 0.99;

/// Oscillator waveform types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// Pure fundamental.
    Sine,
    /// Odd harmonics, softer than saw.
    Triangle,
    /// All harmonics, bright timbre.
    #[default]
    Saw,
    /// Variable-width pulse, 50% by default.
    Square,
    /// White noise.
    Noise,
}

impl Waveform {
    /// All waveforms in wave-mix order.
    pub const ALL: [Waveform; 5] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Saw,
        Waveform::Square,
        Waveform::Noise,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Triangle => "Triangle",
            Waveform::Saw => "Saw",
            Waveform::Square => "Square",
            Waveform::Noise => "Noise",
        }
    }

    /// Render one sample of this waveform at `phase`.
    ///
    /// `dt` is the phase increment per sample (the BLEP window), `pulse_width`
    /// is only read by [`Waveform::Square`] and `rng` only by
    /// [`Waveform::Noise`].
    #[inline]
    pub fn render(self, phase: f64, dt: f64, pulse_width: f64, rng: &mut Rng) -> f64 {
        match self {
            Waveform::Sine => sine(phase),
            Waveform::Triangle => triangle(phase),
            Waveform::Saw => saw(phase, dt),
            Waveform::Square => square(phase, dt, pulse_width),
            Waveform::Noise => rng.next_bipolar(),
        }
    }
}

/// PolyBLEP residual for a unit step at phase 0.
///
/// Non-zero only within one phase increment either side of the
/// discontinuity. Returns 0 for a non-positive increment.
///
/// # Example
///
/// ```rust
/// use tessera_synth::oscillator::poly_blep;
///
/// assert_eq!(poly_blep(0.5, 0.01), 0.0);
/// assert_eq!(poly_blep(0.0, 0.01), -1.0);
/// assert_eq!(poly_blep(0.5, 0.0), 0.0);
/// ```
#[inline]
pub fn poly_blep(t: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        return 0.0;
    }
    if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}

#[inline]
pub(crate) fn sine(phase: f64) -> f64 {
    sin(TWO_PI * phase)
}

#[inline]
pub(crate) fn triangle(phase: f64) -> f64 {
    if phase < 0.5 {
        4.0 * phase - 1.0
    } else {
        3.0 - 4.0 * phase
    }
}

#[inline]
pub(crate) fn saw(phase: f64, dt: f64) -> f64 {
    2.0 * phase - 1.0 - poly_blep(phase, dt)
}

#[inline]
pub(crate) fn square(phase: f64, dt: f64, pulse_width: f64) -> f64 {
    let naive = if phase < pulse_width { 1.0 } else { -1.0 };
    naive + poly_blep(phase, dt) - poly_blep(fmod(phase + 1.0 - pulse_width, 1.0), dt)
}

/// Single-waveform audio oscillator with PolyBLEP anti-aliasing.
///
/// The sample returned by [`process`](Self::process) is computed from the
/// phase *before* the increment is applied.
///
/// # Example
///
/// ```rust
/// use tessera_synth::{Oscillator, Waveform};
///
/// let mut osc = Oscillator::new(48000.0);
/// osc.set_frequency(440.0);
/// osc.set_waveform(Waveform::Square);
///
/// let first = osc.process();
/// assert!(first.abs() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    phase: f64,
    phase_inc: f64,
    frequency: f64,
    sample_rate: f64,
    waveform: Waveform,
    pulse_width: f64,
    rng: Rng,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(tessera_core::NATIVE_SAMPLE_RATE)
    }
}

impl Oscillator {
    /// Create an oscillator at 440 Hz playing a saw.
    pub fn new(sample_rate: f64) -> Self {
        Self::with_seed(sample_rate, 0)
    }

    /// Create an oscillator whose noise generator starts from `seed`.
    pub fn with_seed(sample_rate: f64, seed: u32) -> Self {
        let mut osc = Self {
            phase: 0.0,
            phase_inc: 0.0,
            frequency: 440.0,
            sample_rate,
            waveform: Waveform::default(),
            pulse_width: 0.5,
            rng: Rng::new(seed),
        };
        osc.set_frequency(440.0);
        osc
    }

    /// Set frequency in Hz, clamped to [0, Nyquist].
    pub fn set_frequency(&mut self, freq: f64) {
        self.frequency = freq.clamp(0.0, self.sample_rate * 0.5);
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Get current frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Set frequency from a MIDI note number.
    pub fn set_note(&mut self, note: u8) {
        self.set_frequency(midi_to_freq(note));
    }

    /// Set waveform.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Get current waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Set square-wave duty cycle, clamped to [0.01, 0.99].
    pub fn set_pulse_width(&mut self, pw: f64) {
        self.pulse_width = pw.clamp(MIN_PULSE_WIDTH, MAX_PULSE_WIDTH);
    }

    /// Get square-wave duty cycle.
    pub fn pulse_width(&self) -> f64 {
        self.pulse_width
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

    /// Phase increment per sample.
    pub fn phase_increment(&self) -> f64 {
        self.phase_inc
    }

    /// Generate the next sample.
    #[inline]
    pub fn process(&mut self) -> f64 {
        let out = self
            .waveform
            .render(self.phase, self.phase_inc, self.pulse_width, &mut self.rng);
        self.advance();
        out
    }

    #[inline]
    fn advance(&mut self) {
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
    }
}
