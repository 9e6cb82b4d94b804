//! Wave-blending oscillator.
//!
//! Renders all five waveforms from one shared phase accumulator and sums
//! them by weight, so a timbre can morph continuously instead of switching
//! waveforms. Normalization happens at process time: the weighted sum is
//! divided by the total weight, and a mix whose total is not positive
//! produces silence.

use tessera_core::{Rng, midi_to_freq};

use crate::oscillator::{MAX_PULSE_WIDTH, MIN_PULSE_WIDTH, Waveform, saw, sine, square, triangle};

/// Five non-negative waveform weights.
///
/// Weights are stored as given; [`BlendOscillator::set_mix`] clamps them
/// to [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveMix {
    /// Sine weight.
    pub sine: f64,
    /// Triangle weight.
    pub triangle: f64,
    /// Sawtooth weight.
    pub sawtooth: f64,
    /// Square weight.
    pub square: f64,
    /// Noise weight.
    pub noise: f64,
}

impl Default for WaveMix {
    fn default() -> Self {
        Self::solo(Waveform::Saw)
    }
}

impl WaveMix {
    /// All weights zero.
    pub const SILENT: WaveMix = WaveMix::new(0.0, 0.0, 0.0, 0.0, 0.0);

    /// Build a mix from weights in sine, triangle, saw, square, noise order.
    pub const fn new(sine: f64, triangle: f64, sawtooth: f64, square: f64, noise: f64) -> Self {
        Self {
            sine,
            triangle,
            sawtooth,
            square,
            noise,
        }
    }

    /// A mix with weight 1 on `waveform` and 0 elsewhere.
    pub fn solo(waveform: Waveform) -> Self {
        let mut mix = Self::SILENT;
        mix.set(waveform, 1.0);
        mix
    }

    /// Weight for `waveform`.
    pub fn get(&self, waveform: Waveform) -> f64 {
        match waveform {
            Waveform::Sine => self.sine,
            Waveform::Triangle => self.triangle,
            Waveform::Saw => self.sawtooth,
            Waveform::Square => self.square,
            Waveform::Noise => self.noise,
        }
    }

    /// Set the weight for `waveform` (unclamped).
    pub fn set(&mut self, waveform: Waveform, weight: f64) {
        match waveform {
            Waveform::Sine => self.sine = weight,
            Waveform::Triangle => self.triangle = weight,
            Waveform::Saw => self.sawtooth = weight,
            Waveform::Square => self.square = weight,
            Waveform::Noise => self.noise = weight,
        }
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.sine + self.triangle + self.sawtooth + self.square + self.noise
    }

    /// Copy scaled so the weights sum to 1. Unchanged when the total is ≤ 0.
    ///
    /// ```rust
    /// use tessera_synth::WaveMix;
    ///
    /// let mix = WaveMix::new(2.0, 2.0, 0.0, 0.0, 0.0).normalized();
    /// assert_eq!(mix, WaveMix::new(0.5, 0.5, 0.0, 0.0, 0.0));
    /// ```
    pub fn normalized(&self) -> Self {
        let total = self.total();
        if total <= 0.0 {
            return *self;
        }
        Self::new(
            self.sine / total,
            self.triangle / total,
            self.sawtooth / total,
            self.square / total,
            self.noise / total,
        )
    }

    /// Copy with every weight clamped to [0, 1].
    pub fn clamped(&self) -> Self {
        Self::new(
            self.sine.clamp(0.0, 1.0),
            self.triangle.clamp(0.0, 1.0),
            self.sawtooth.clamp(0.0, 1.0),
            self.square.clamp(0.0, 1.0),
            self.noise.clamp(0.0, 1.0),
        )
    }
}

/// Oscillator that blends all five waveforms from one phase.
///
/// # Example
///
/// ```rust
/// use tessera_synth::{BlendOscillator, WaveMix};
///
/// let mut osc = BlendOscillator::new(48000.0);
/// osc.set_frequency(220.0);
/// osc.set_mix(WaveMix::new(1.0, 0.0, 1.0, 0.0, 0.0)); // half sine, half saw
///
/// let s = osc.process();
/// assert!(s.abs() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct BlendOscillator {
    phase: f64,
    phase_inc: f64,
    frequency: f64,
    sample_rate: f64,
    mix: WaveMix,
    pulse_width: f64,
    rng: Rng,
}

impl Default for BlendOscillator {
    fn default() -> Self {
        Self::new(tessera_core::NATIVE_SAMPLE_RATE)
    }
}

impl BlendOscillator {
    /// Create a blend oscillator at 440 Hz with the default (saw) mix.
    pub fn new(sample_rate: f64) -> Self {
        Self::with_seed(sample_rate, 0)
    }

    /// Create a blend oscillator whose noise generator starts from `seed`.
    pub fn with_seed(sample_rate: f64, seed: u32) -> Self {
        let mut osc = Self {
            phase: 0.0,
            phase_inc: 0.0,
            frequency: 440.0,
            sample_rate,
            mix: WaveMix::default(),
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

    /// Replace all weights, each clamped to [0, 1].
    pub fn set_mix(&mut self, mix: WaveMix) {
        self.mix = mix.clamped();
    }

    /// Set one weight, clamped to [0, 1].
    pub fn set_weight(&mut self, waveform: Waveform, weight: f64) {
        self.mix.set(waveform, weight.clamp(0.0, 1.0));
    }

    /// Current weights.
    pub fn mix(&self) -> WaveMix {
        self.mix
    }

    /// Set square duty cycle, clamped to [0.01, 0.99].
    pub fn set_pulse_width(&mut self, pw: f64) {
        self.pulse_width = pw.clamp(MIN_PULSE_WIDTH, MAX_PULSE_WIDTH);
    }

    /// Square duty cycle.
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

    /// Generate the next blended sample.
    #[inline]
    pub fn process(&mut self) -> f64 {
        let out = self.blend();
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }

    #[inline]
    fn blend(&mut self) -> f64 {
        let total = self.mix.total();
        if total <= 0.0 {
            return 0.0;
        }

        let p = self.phase;
        let dt = self.phase_inc;
        let mut sum = 0.0;
        if self.mix.sine > 0.0 {
            sum += self.mix.sine * sine(p);
        }
        if self.mix.triangle > 0.0 {
            sum += self.mix.triangle * triangle(p);
        }
        if self.mix.sawtooth > 0.0 {
            sum += self.mix.sawtooth * saw(p, dt);
        }
        if self.mix.square > 0.0 {
            sum += self.mix.square * square(p, dt, self.pulse_width);
        }
        if self.mix.noise > 0.0 {
            sum += self.mix.noise * self.rng.next_bipolar();
        }
        sum / total
    }
}
