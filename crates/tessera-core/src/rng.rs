//! Seedable per-instance pseudo-random source.
//!
//! Noise oscillators and sample-and-hold LFOs each own one [`Rng`]. The
//! generator is a 32-bit xorshift: no allocation, no locking, and the whole
//! sequence is reproducible from the seed.

/// Xorshift32 generator.
///
/// # Example
///
/// ```rust
/// use tessera_core::Rng;
///
/// let mut a = Rng::new(7);
/// let mut b = Rng::new(7);
/// assert_eq!(a.next_bipolar(), b.next_bipolar());
/// ```
#[derive(Debug, Clone)]
pub struct Rng {
    state: u32,
}

impl Default for Rng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Rng {
    /// Create a generator from a seed. Any seed is valid, including zero.
    pub fn new(seed: u32) -> Self {
        Self {
            state: scramble(seed),
        }
    }

    /// Restart the sequence from `seed`.
    pub fn reseed(&mut self, seed: u32) {
        self.state = scramble(seed);
    }

    /// Next raw 32-bit value.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Next value uniformly distributed in [-1.0, 1.0].
    #[inline]
    pub fn next_bipolar(&mut self) -> f64 {
        f64::from(self.next_u32()) / f64::from(u32::MAX) * 2.0 - 1.0
    }
}

/// Spread nearby seeds apart and keep the state off xorshift's zero fixed point.
fn scramble(seed: u32) -> u32 {
    let mut z = seed.wrapping_add(0x9E37_79B9);
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^= z >> 16;
    if z == 0 { 0x6D2B_79F5 } else { z }
}
