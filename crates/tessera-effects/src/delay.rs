//! Stereo feedback delay.

use tessera_core::{
    DelayLine, Effect, NATIVE_SAMPLE_RATE, ParamDescriptor, ParamUnit, ParameterInfo,
    flush_denormal, ms_to_samples, wet_dry_mix,
};

/// Default maximum delay time.
pub const DEFAULT_MAX_DELAY_MS: f64 = 2000.0;

const TIME: ParamDescriptor =
    ParamDescriptor::time_ms("Delay Time", "Time", 1.0, DEFAULT_MAX_DELAY_MS, 500.0);

const FEEDBACK: ParamDescriptor = ParamDescriptor {
    name: "Feedback",
    short_name: "Fdbk",
    unit: ParamUnit::Ratio,
    min: 0.0,
    max: 0.95,
    default: 0.5,
    step: 0.05,
};

/// Feedback delay with one ring buffer per channel.
///
/// The read head sits a whole number of samples behind the write head. The
/// delayed sample is fed back into the buffer together with the input, and
/// the output crossfades between the input and the delayed sample.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Delay Time | 1–2000 ms | 500 |
/// | 1 | Feedback | 0–0.95 | 0.5 |
/// | 2 | Mix | 0–1 | 0.5 |
///
/// # Example
///
/// ```rust
/// use tessera_core::Effect;
/// use tessera_effects::Delay;
///
/// let mut delay = Delay::new(48000.0);
/// delay.set_time_ms(10.0);
/// delay.set_feedback(0.0);
/// delay.set_mix(1.0);
///
/// let mut echo = 0.0;
/// for i in 0..=480 {
///     let x = if i == 0 { 1.0 } else { 0.0 };
///     echo = delay.process_stereo(x, x).0;
/// }
/// assert_eq!(echo, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Delay {
    left: DelayLine,
    right: DelayLine,
    max_delay_ms: f64,
    time_ms: f64,
    delay_samples: usize,
    feedback: f64,
    mix: f64,
    sample_rate: f64,
}

impl Default for Delay {
    fn default() -> Self {
        Self::new(NATIVE_SAMPLE_RATE)
    }
}

impl Delay {
    /// Create a delay with a two-second buffer.
    pub fn new(sample_rate: f64) -> Self {
        Self::with_max_delay_ms(sample_rate, DEFAULT_MAX_DELAY_MS)
    }

    /// Create a delay with a custom buffer length.
    pub fn with_max_delay_ms(sample_rate: f64, max_delay_ms: f64) -> Self {
        let len = buffer_len(max_delay_ms, sample_rate);
        let mut delay = Self {
            left: DelayLine::new(len),
            right: DelayLine::new(len),
            max_delay_ms,
            time_ms: TIME.default,
            delay_samples: 0,
            feedback: FEEDBACK.default,
            mix: ParamDescriptor::mix().default,
            sample_rate,
        };
        delay.update_delay_samples();
        delay
    }

    /// Set delay time in ms, clamped to [1, 2000].
    ///
    /// The delay in samples is further capped at the buffer length minus one.
    pub fn set_time_ms(&mut self, ms: f64) {
        self.time_ms = TIME.clamp(ms);
        self.update_delay_samples();
    }

    /// Delay time in ms.
    pub fn time_ms(&self) -> f64 {
        self.time_ms
    }

    /// Effective delay in whole samples.
    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    /// Set feedback, clamped to [0, 0.95].
    pub fn set_feedback(&mut self, feedback: f64) {
        self.feedback = FEEDBACK.clamp(feedback);
    }

    /// Feedback amount.
    pub fn feedback(&self) -> f64 {
        self.feedback
    }

    /// Set dry/wet mix, clamped to [0, 1].
    pub fn set_mix(&mut self, mix: f64) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    /// Dry/wet mix.
    pub fn mix(&self) -> f64 {
        self.mix
    }

    /// Zero both ring buffers.
    pub fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
    }

    fn update_delay_samples(&mut self) {
        let wanted = ms_to_samples(self.time_ms, self.sample_rate) as usize;
        self.delay_samples = wanted.min(self.left.len() - 1);
    }
}

fn buffer_len(max_delay_ms: f64, sample_rate: f64) -> usize {
    (ms_to_samples(max_delay_ms, sample_rate) as usize).max(2)
}

impl Effect for Delay {
    #[inline]
    fn process_stereo(&mut self, left: f64, right: f64) -> (f64, f64) {
        let delayed_left = self.left.read(self.delay_samples);
        let delayed_right = self.right.read(self.delay_samples);

        self.left.push(flush_denormal(left + delayed_left * self.feedback));
        self.right.push(flush_denormal(right + delayed_right * self.feedback));

        (
            wet_dry_mix(left, delayed_left, self.mix),
            wet_dry_mix(right, delayed_right, self.mix),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        let len = buffer_len(self.max_delay_ms, sample_rate);
        self.left = DelayLine::new(len);
        self.right = DelayLine::new(len);
        self.update_delay_samples();
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl ParameterInfo for Delay {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(TIME),
            1 => Some(FEEDBACK),
            2 => Some(ParamDescriptor::mix()),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f64 {
        match index {
            0 => self.time_ms,
            1 => self.feedback,
            2 => self.mix,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f64) {
        match index {
            0 => self.set_time_ms(value),
            1 => self.set_feedback(value),
            2 => self.set_mix(value),
            _ => {}
        }
    }
}
