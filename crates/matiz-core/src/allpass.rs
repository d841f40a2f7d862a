//! Schroeder allpass diffuser.
//!
//! Follows the comb bank in the reverb chain. An allpass passes all
//! frequencies at equal gain but smears their phase, which turns the comb
//! bank's discrete echoes into a dense, diffuse tail.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::math::flush_denormal;

/// A Schroeder allpass filter with a fixed delay length.
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    buffer: Vec<f32>,
    index: usize,
    feedback: f32,
}

impl AllpassFilter {
    /// Create an allpass with the given delay length in samples.
    ///
    /// A zero delay is bumped to one sample.
    pub fn new(delay_length: usize, feedback: f32) -> Self {
        Self {
            buffer: vec![0.0; delay_length.max(1)],
            index: 0,
            feedback: feedback.clamp(0.0, 1.0),
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

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let buffered = flush_denormal(self.buffer[self.index]);
        let output = -input + buffered;

        self.buffer[self.index] = input + buffered * self.feedback;
        self.index = (self.index + 1) % self.buffer.len();

        output
    }

    /// Zero the delay buffer.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.index = 0;
    }
}
