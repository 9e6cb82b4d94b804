//! Ring-buffer delay line.
//!
//! Shared storage for the chorus, the feedback delay, and the reverb's comb
//! and allpass sections. The buffer is allocated once at construction and
//! never resized.
//!
//! # Addressing
//!
//! Reads are relative to the write head: `read(d)` returns the slot `d`
//! positions behind it. Effects that read before writing see the sample
//! pushed `d` ticks ago; effects that write first (the chorus) see the
//! current input at `d = 0`.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use libm::floor;

/// Fixed-capacity circular delay buffer.
///
/// # Example
///
/// ```rust
/// use tessera_core::DelayLine;
///
/// let mut line = DelayLine::new(4);
/// for x in [1.0, 2.0, 3.0] {
///     line.push(x);
/// }
/// assert_eq!(line.read(1), 3.0);
/// assert_eq!(line.read(3), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f64>,
    write_pos: usize,
}

impl DelayLine {
    /// Create a zeroed line holding `len` samples (at least one).
    pub fn new(len: usize) -> Self {
        #[cfg(feature = "tracing")]
        tracing::trace!(len, "delay line allocated");
        Self {
            buffer: vec![0.0; len.max(1)],
            write_pos: 0,
        }
    }

    /// Capacity in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; a line holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Current write position.
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Sample `delay` slots behind the write head (wrapped).
    #[inline]
    pub fn read(&self, delay: usize) -> f64 {
        let len = self.buffer.len();
        self.buffer[(self.write_pos + len - delay % len) % len]
    }

    /// Sample under the write head: the oldest sample in the ring.
    #[inline]
    pub fn oldest(&self) -> f64 {
        self.buffer[self.write_pos]
    }

    /// Linearly interpolated read `delay` slots behind the write head.
    ///
    /// The fractional part blends toward the newer neighbour.
    #[inline]
    pub fn read_fractional(&self, delay: f64) -> f64 {
        let len = self.buffer.len();
        let mut pos = self.write_pos as f64 - delay;
        if pos < 0.0 {
            pos += len as f64;
        }
        let base = floor(pos);
        let frac = pos - base;
        let idx0 = (base as usize) % len;
        let idx1 = (idx0 + 1) % len;
        self.buffer[idx0] * (1.0 - frac) + self.buffer[idx1] * frac
    }

    /// Overwrite the slot under the write head without advancing.
    #[inline]
    pub fn write(&mut self, sample: f64) {
        self.buffer[self.write_pos] = sample;
    }

    /// Move the write head forward one slot.
    #[inline]
    pub fn advance(&mut self) {
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Write then advance.
    #[inline]
    pub fn push(&mut self, sample: f64) {
        self.write(sample);
        self.advance();
    }

    /// Zero the buffer and rewind the write head.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// True when every stored sample is exactly zero.
    pub fn is_silent(&self) -> bool {
        self.buffer.iter().all(|&s| s == 0.0)
    }
}
