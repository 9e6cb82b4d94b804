//! Allpass-style diffusion section for the Schroeder reverb.

use crate::DelayLine;
use crate::flush_denormal;

/// Schroeder allpass section.
///
/// ```text
/// delayed = buf[pos]
/// output  = −g × input + delayed
/// buf[pos] = input + g × delayed
/// ```
///
/// # Example
///
/// ```rust
/// use tessera_core::AllpassFilter;
///
/// let mut ap = AllpassFilter::new(2, 0.7);
/// assert!((ap.process(1.0) + 0.7).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    line: DelayLine,
    gain: f64,
}

impl AllpassFilter {
    /// Create an allpass with a `len`-sample loop and gain `g`.
    pub fn new(len: usize, gain: f64) -> Self {
        Self {
            line: DelayLine::new(len),
            gain,
        }
    }

    /// Loop gain.
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let delayed = self.line.oldest();
        let output = -self.gain * input + delayed;
        self.line.push(flush_denormal(input + self.gain * delayed));
        output
    }

    /// Zero the loop.
    pub fn clear(&mut self) {
        self.line.clear();
    }

    /// Loop length in samples.
    pub fn len(&self) -> usize {
        self.line.len()
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// True when the loop holds only zeros.
    pub fn is_silent(&self) -> bool {
        self.line.is_silent()
    }
}
