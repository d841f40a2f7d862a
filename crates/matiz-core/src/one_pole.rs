//! One-pole lowpass smoother.

use libm::expf;

use crate::math::flush_denormal;

/// A first-order lowpass, `y[n] = y[n-1] + a * (x[n] - y[n-1])`.
///
/// Used for gentle tone shaping (the distortion's tone knob) where a full
/// biquad section would be overkill.
#[derive(Debug, Clone)]
pub struct OnePole {
    coeff: f32,
    state: f32,
}

impl OnePole {
    /// Create a lowpass with the given cutoff frequency.
    pub fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        let mut filter = Self {
            coeff: 1.0,
            state: 0.0,
        };
        filter.set_cutoff(cutoff_hz, sample_rate);
        filter
    }

    /// Retune the cutoff frequency without clearing state.
    pub fn set_cutoff(&mut self, cutoff_hz: f32, sample_rate: f32) {
        let cutoff = cutoff_hz.clamp(1.0, sample_rate * 0.49);
        self.coeff = 1.0 - expf(-2.0 * core::f32::consts::PI * cutoff / sample_rate);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(self.state + self.coeff * (input - self.state));
        self.state
    }

    /// Zero the filter state.
    pub fn clear(&mut self) {
        self.state = 0.0;
    }
}
