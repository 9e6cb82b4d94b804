//! Stereo chorus built from two LFO-modulated delay lines.

use tessera_core::{
    DelayLine, Effect, Lfo, LfoShape, NATIVE_SAMPLE_RATE, ParamDescriptor, ParamUnit,
    ParameterInfo, ms_to_samples, wet_dry_mix,
};

/// Ring buffer length in milliseconds.
const BUFFER_MS: f64 = 50.0;
/// Centre of the modulated delay.
const BASE_DELAY_MS: f64 = 7.0;
/// Delay swing at full depth, either side of the centre.
const MOD_RANGE_MS: f64 = 3.0;
/// Right LFO runs this much faster than the left for stereo width.
const RIGHT_RATE_RATIO: f64 = 1.1;

const RATE: ParamDescriptor = ParamDescriptor {
    name: "Rate",
    short_name: "Rate",
    unit: ParamUnit::Hertz,
    min: 0.1,
    max: 5.0,
    default: 0.5,
    step: 0.1,
};

/// Stereo chorus with independent left and right modulation.
///
/// Each channel has its own ring buffer and sine LFO. The read head sits
/// `7 ms ± 3 ms × depth` behind the write head and is linearly interpolated.
/// Each frame writes the input first, then reads, then advances.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Rate | 0.1–5.0 Hz | 0.5 |
/// | 1 | Depth | 0–1 | 0.5 |
/// | 2 | Mix | 0–1 | 0.5 |
///
/// # Example
///
/// ```rust
/// use tessera_core::Effect;
/// use tessera_effects::Chorus;
///
/// let mut chorus = Chorus::new(48000.0);
/// chorus.set_rate(1.5);
/// chorus.set_depth(0.7);
///
/// let (l, r) = chorus.process_stereo(0.5, 0.5);
/// assert!(l.is_finite() && r.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Chorus {
    left: DelayLine,
    right: DelayLine,
    lfo_left: Lfo,
    lfo_right: Lfo,
    rate: f64,
    depth: f64,
    mix: f64,
    sample_rate: f64,
}

impl Default for Chorus {
    fn default() -> Self {
        Self::new(NATIVE_SAMPLE_RATE)
    }
}

impl Chorus {
    /// Create a chorus at 0.5 Hz, depth 0.5, mix 0.5.
    pub fn new(sample_rate: f64) -> Self {
        let len = buffer_len(sample_rate);
        let mut chorus = Self {
            left: DelayLine::new(len),
            right: DelayLine::new(len),
            lfo_left: Lfo::new(sample_rate),
            lfo_right: Lfo::new(sample_rate),
            rate: RATE.default,
            depth: ParamDescriptor::depth().default,
            mix: ParamDescriptor::mix().default,
            sample_rate,
        };
        chorus.lfo_left.set_shape(LfoShape::Sine);
        chorus.lfo_right.set_shape(LfoShape::Sine);
        chorus.set_rate(RATE.default);
        chorus
    }

    /// Set the LFO rate in Hz, clamped to [0.1, 5]. The right LFO runs ×1.1.
    pub fn set_rate(&mut self, hz: f64) {
        self.rate = RATE.clamp(hz);
        self.lfo_left.set_rate(self.rate);
        self.lfo_right.set_rate(self.rate * RIGHT_RATE_RATIO);
    }

    /// LFO rate in Hz.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Set modulation depth, clamped to [0, 1].
    pub fn set_depth(&mut self, depth: f64) {
        self.depth = depth.clamp(0.0, 1.0);
    }

    /// Modulation depth.
    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Set dry/wet mix, clamped to [0, 1].
    pub fn set_mix(&mut self, mix: f64) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    /// Dry/wet mix.
    pub fn mix(&self) -> f64 {
        self.mix
    }

    /// Zero both ring buffers. LFO phases keep running.
    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

fn buffer_len(sample_rate: f64) -> usize {
    (ms_to_samples(BUFFER_MS, sample_rate) as usize).max(2)
}

impl Effect for Chorus {
    #[inline]
    fn process_stereo(&mut self, left: f64, right: f64) -> (f64, f64) {
        self.left.write(left);
        self.right.write(right);

        let swing = self.depth * MOD_RANGE_MS;
        let delay_left =
            ms_to_samples(BASE_DELAY_MS + self.lfo_left.process() * swing, self.sample_rate);
        let delay_right =
            ms_to_samples(BASE_DELAY_MS + self.lfo_right.process() * swing, self.sample_rate);

        let wet_left = self.left.read_fractional(delay_left);
        let wet_right = self.right.read_fractional(delay_right);

        self.left.advance();
        self.right.advance();

        (
            wet_dry_mix(left, wet_left, self.mix),
            wet_dry_mix(right, wet_right, self.mix),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        let len = buffer_len(sample_rate);
        self.left = DelayLine::new(len);
        self.right = DelayLine::new(len);
        self.lfo_left.set_sample_rate(sample_rate);
        self.lfo_right.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.clear();
        self.lfo_left.sync();
        self.lfo_right.sync();
    }
}

impl ParameterInfo for Chorus {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(RATE),
            1 => Some(ParamDescriptor::depth()),
            2 => Some(ParamDescriptor::mix()),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f64 {
        match index {
            0 => self.rate,
            1 => self.depth,
            2 => self.mix,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f64) {
        match index {
            0 => self.set_rate(value),
            1 => self.set_depth(value),
            2 => self.set_mix(value),
            _ => {}
        }
    }
}
