//! Circular delay line with linear interpolation.
//!
//! Backs the time-modulated effects (chorus, flanger). The read position is
//! fractional so a sweeping delay time does not produce zipper noise.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// A fixed-capacity circular delay line with fractional reads.
///
/// Writes advance a single write head; reads take a delay in samples
/// (possibly fractional) and linearly interpolate between the two
/// neighboring stored samples.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Create a delay line able to hold `capacity` samples.
    ///
    /// A capacity of zero is bumped to one so reads are always defined.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(1)],
            write_pos: 0,
        }
    }

    /// Maximum delay in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Push one sample into the line.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Read the sample written `delay_samples` writes ago, linearly
    /// interpolated between the two nearest stored samples.
    ///
    /// The delay is clamped to [1, capacity]. Called before `write` in a
    /// sample loop, `read(n)` yields the input from exactly `n` samples ago,
    /// which is what the modulated effects rely on.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(1.0, len as f32);
        let delay_int = delay as usize;
        let frac = delay - delay_int as f32;

        let read_pos = (self.write_pos + len - delay_int.min(len)) % len;
        let a = self.buffer[read_pos];
        let b = self.buffer[(read_pos + len - 1) % len];
        a + frac * (b - a)
    }

    /// Zero the stored samples and reset the write head.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
