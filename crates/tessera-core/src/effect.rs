//! Stereo effect trait.
//!
//! The post-voice chain works on stereo frames: the engine produces a mono
//! sum duplicated to both channels and the effects introduce the stereo
//! image.
//!
//! ## Design Decisions
//!
//! - **Object-safe**: `dyn Effect` works for runtime chains, while the
//!   built-in chain uses static dispatch.
//! - **No allocations**: every method is callable from the audio callback.

/// Core trait for stereo audio effects.
///
/// # Example
///
/// ```rust
/// use tessera_core::Effect;
///
/// struct Swap;
///
/// impl Effect for Swap {
///     fn process_stereo(&mut self, left: f64, right: f64) -> (f64, f64) {
///         (right, left)
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f64) {}
///
///     fn reset(&mut self) {}
/// }
///
/// let mut fx = Swap;
/// assert_eq!(fx.process_stereo(1.0, 2.0), (2.0, 1.0));
/// ```
pub trait Effect {
    /// Process one stereo frame.
    fn process_stereo(&mut self, left: f64, right: f64) -> (f64, f64);

    /// Process a block of stereo frames in place.
    ///
    /// # Panics
    /// Debug builds panic if the channel slices differ in length.
    fn process_block_stereo(&mut self, left: &mut [f64], right: &mut [f64]) {
        debug_assert_eq!(
            left.len(),
            right.len(),
            "Left and right buffers must have same length"
        );
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (ol, or) = self.process_stereo(*l, *r);
            *l = ol;
            *r = or;
        }
    }

    /// Update the sample rate and recompute rate-dependent state.
    ///
    /// May reallocate buffers; call it outside the audio callback.
    fn set_sample_rate(&mut self, sample_rate: f64);

    /// Clear internal buffers without touching parameters.
    fn reset(&mut self);

    /// Processing latency in samples. Default 0.
    fn latency_samples(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gain(f64);

    impl Effect for Gain {
        fn process_stereo(&mut self, left: f64, right: f64) -> (f64, f64) {
            (left * self.0, right * self.0)
        }

        fn set_sample_rate(&mut self, _sample_rate: f64) {}

        fn reset(&mut self) {}
    }

    #[test]
    fn test_block_default_matches_per_frame() {
        let mut fx = Gain(0.5);
        let mut left = [1.0, 2.0, 3.0];
        let mut right = [-1.0, -2.0, -3.0];
        fx.process_block_stereo(&mut left, &mut right);
        assert_eq!(left, [0.5, 1.0, 1.5]);
        assert_eq!(right, [-0.5, -1.0, -1.5]);
    }

    #[test]
    fn test_object_safe() {
        let mut gain = Gain(2.0);
        let fx: &mut dyn Effect = &mut gain;
        assert_eq!(fx.process_stereo(1.0, 1.0), (2.0, 2.0));
        assert_eq!(fx.latency_samples(), 0);
    }
}
