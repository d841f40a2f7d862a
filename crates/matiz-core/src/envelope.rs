//! Envelope follower with independent attack and release.
//!
//! Tracks the rectified level of a signal. The dynamics processors
//! (compressor, expander) and the auto-wah read this envelope to decide
//! how much gain to apply or where to park the filter sweep.

use libm::expf;

use crate::math::flush_denormal;

/// A peak envelope follower with exponential attack and release.
///
/// The smoothing coefficients come from the usual time-constant mapping
/// `coeff = exp(-1 / (sample_rate * time_ms / 1000))`, so after `time_ms`
/// the envelope covers roughly 63% of a step.
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    attack_coeff: f32,
    release_coeff: f32,
    envelope: f32,
}

fn time_coeff(time_ms: f32, sample_rate: f32) -> f32 {
    let time_ms = time_ms.max(0.01);
    expf(-1.0 / (sample_rate * time_ms / 1000.0))
}

impl EnvelopeFollower {
    /// Create a follower with the given attack and release times in ms.
    pub fn new(attack_ms: f32, release_ms: f32, sample_rate: f32) -> Self {
        Self {
            attack_coeff: time_coeff(attack_ms, sample_rate),
            release_coeff: time_coeff(release_ms, sample_rate),
            envelope: 0.0,
        }
    }

    /// Set the attack time in milliseconds.
    pub fn set_attack(&mut self, attack_ms: f32, sample_rate: f32) {
        self.attack_coeff = time_coeff(attack_ms, sample_rate);
    }

    /// Set the release time in milliseconds.
    pub fn set_release(&mut self, release_ms: f32, sample_rate: f32) {
        self.release_coeff = time_coeff(release_ms, sample_rate);
    }

    /// Feed one sample and return the updated envelope.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let level = input.abs();
        let coeff = if level > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = flush_denormal(level + coeff * (self.envelope - level));
        self.envelope
    }

    /// Current envelope value without advancing.
    pub fn value(&self) -> f32 {
        self.envelope
    }

    /// Reset the envelope to zero.
    pub fn clear(&mut self) {
        self.envelope = 0.0;
    }
}
