//! Low-frequency sine oscillator.
//!
//! Drives the sweep of the modulation effects. Phase can be offset at
//! construction so stereo channels modulate out of step with each other.

use libm::sinf;

const TWO_PI: f32 = 2.0 * core::f32::consts::PI;

/// A sine LFO producing values in [-1, 1].
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f32,
    increment: f32,
}

impl Lfo {
    /// Create an LFO at `rate_hz` with an initial phase offset in radians.
    pub fn new(rate_hz: f32, phase_offset: f32, sample_rate: f32) -> Self {
        Self {
            phase: phase_offset.rem_euclid(TWO_PI),
            increment: TWO_PI * rate_hz.max(0.0) / sample_rate,
        }
    }

    /// Change the rate without resetting phase.
    pub fn set_rate(&mut self, rate_hz: f32, sample_rate: f32) {
        self.increment = TWO_PI * rate_hz.max(0.0) / sample_rate;
    }

    /// Produce the next sample and advance the phase.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let value = sinf(self.phase);
        self.phase += self.increment;
        if self.phase >= TWO_PI {
            self.phase -= TWO_PI;
        }
        value
    }

    /// Next sample mapped to [0, 1], handy for unipolar sweeps.
    #[inline]
    pub fn next_unipolar(&mut self) -> f32 {
        0.5 * (self.next() + 1.0)
    }

    /// Reset the phase to the given offset in radians.
    pub fn reset(&mut self, phase_offset: f32) {
        self.phase = phase_offset.rem_euclid(TWO_PI);
    }
}
