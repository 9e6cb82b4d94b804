//! Feedback comb filter for Schroeder reverbs.

use crate::DelayLine;
use crate::flush_denormal;

/// Feedback comb: `out = buf[pos]; buf[pos] = in + out × feedback`.
///
/// The loop length equals the buffer length.
///
/// # Example
///
/// ```rust
/// use tessera_core::CombFilter;
///
/// let mut comb = CombFilter::new(3);
/// comb.set_feedback(0.5);
/// let outs: Vec<f64> = (0..7).map(|i| comb.process(if i == 0 { 1.0 } else { 0.0 })).collect();
/// assert_eq!(outs, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5]);
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    line: DelayLine,
    feedback: f64,
}

impl CombFilter {
    /// Create a comb with a loop of `len` samples and zero feedback.
    pub fn new(len: usize) -> Self {
        Self {
            line: DelayLine::new(len),
            feedback: 0.0,
        }
    }

    /// Set the loop gain. Callers keep it below 1 for a decaying tail.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f64) {
        self.feedback = feedback;
    }

    /// Current loop gain.
    pub fn feedback(&self) -> f64 {
        self.feedback
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.line.oldest();
        self.line.push(flush_denormal(input + output * self.feedback));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_echoes_decay_geometrically() {
        let mut comb = CombFilter::new(10);
        comb.set_feedback(0.8);
        let mut echoes = Vec::new();
        for i in 0..50 {
            let y = comb.process(if i == 0 { 1.0 } else { 0.0 });
            if y != 0.0 {
                echoes.push((i, y));
            }
        }
        assert_eq!(echoes.len(), 4);
        assert_eq!(echoes[0], (10, 1.0));
        assert!((echoes[1].1 - 0.8).abs() < 1e-12);
        assert!((echoes[3].1 - 0.512).abs() < 1e-12);
    }

    #[test]
    fn test_clear_silences() {
        let mut comb = CombFilter::new(16);
        comb.set_feedback(0.9);
        for _ in 0..100 {
            comb.process(1.0);
        }
        comb.clear();
        comb.clear();
        assert!(comb.is_silent());
        assert_eq!(comb.process(0.0), 0.0);
    }
}
