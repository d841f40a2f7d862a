//! Feedback comb filter with damping.
//!
//! The building block of the reverb's parallel bank. Each comb delays its
//! input by a fixed number of samples and feeds the output back in, with a
//! one-pole lowpass in the feedback path so high frequencies decay faster
//! than lows, the way air absorption shapes a real room tail.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::math::flush_denormal;

/// A lowpass-damped feedback comb filter.
///
/// The stored sample at the write index is read out *before* the new input
/// is written, so an impulse first appears at the output exactly
/// `delay_length` samples after it goes in.
#[derive(Debug, Clone)]
pub struct CombFilter {
    buffer: Vec<f32>,
    index: usize,
    feedback: f32,
    damping: f32,
    filter_store: f32,
}

impl CombFilter {
    /// Create a comb with the given delay length in samples.
    ///
    /// A zero delay is bumped to one sample.
    pub fn new(delay_length: usize, feedback: f32, damping: f32) -> Self {
        Self {
            buffer: vec![0.0; delay_length.max(1)],
            index: 0,
            feedback: feedback.clamp(0.0, 1.0),
            damping: damping.clamp(0.0, 1.0),
            filter_store: 0.0,
        }
    }

    /// Delay length in samples.
    pub fn delay_length(&self) -> usize {
        self.buffer.len()
    }

    /// Set the feedback gain, clamped to [0, 1].
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 1.0);
    }

    /// Set the damping amount, clamped to [0, 1].
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.index];

        self.filter_store =
            flush_denormal(output * (1.0 - self.damping) + self.filter_store * self.damping);

        self.buffer[self.index] = input + self.filter_store * self.feedback;
        self.index = (self.index + 1) % self.buffer.len();

        output
    }

    /// Zero the delay buffer and damping state.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.filter_store = 0.0;
        self.index = 0;
    }
}
