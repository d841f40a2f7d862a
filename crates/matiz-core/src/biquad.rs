//! Second-order IIR filter with cookbook coefficient recipes.
//!
//! One [`Biquad`] section covers the tone-shaping needs of the equalizer
//! (peaking bands), the wah (bandpass), the notch filter, and the resonant
//! lowpass (cascaded sections). Coefficients come from the standard audio-EQ
//! cookbook formulas and are normalized so `a0 == 1`.

use libm::{cosf, powf, sinf};

use crate::math::flush_denormal;

/// Normalized biquad coefficients (`a0` divided out).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    /// Feedforward coefficients.
    pub b0: f32,
    /// Feedforward, one sample back.
    pub b1: f32,
    /// Feedforward, two samples back.
    pub b2: f32,
    /// Feedback, one sample back.
    pub a1: f32,
    /// Feedback, two samples back.
    pub a2: f32,
}

impl BiquadCoeffs {
    /// A pass-through section.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };
}

fn omega(frequency: f32, sample_rate: f32) -> f32 {
    2.0 * core::f32::consts::PI * frequency / sample_rate
}

/// Lowpass coefficients at the given cutoff and resonance.
pub fn lowpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> BiquadCoeffs {
    let w0 = omega(frequency, sample_rate);
    let (sin_w0, cos_w0) = (sinf(w0), cosf(w0));
    let alpha = sin_w0 / (2.0 * q.max(0.01));

    let a0 = 1.0 + alpha;
    BiquadCoeffs {
        b0: (1.0 - cos_w0) / 2.0 / a0,
        b1: (1.0 - cos_w0) / a0,
        b2: (1.0 - cos_w0) / 2.0 / a0,
        a1: -2.0 * cos_w0 / a0,
        a2: (1.0 - alpha) / a0,
    }
}

/// Bandpass coefficients (constant 0 dB peak gain) at the given center.
pub fn bandpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> BiquadCoeffs {
    let w0 = omega(frequency, sample_rate);
    let (sin_w0, cos_w0) = (sinf(w0), cosf(w0));
    let alpha = sin_w0 / (2.0 * q.max(0.01));

    let a0 = 1.0 + alpha;
    BiquadCoeffs {
        b0: alpha / a0,
        b1: 0.0,
        b2: -alpha / a0,
        a1: -2.0 * cos_w0 / a0,
        a2: (1.0 - alpha) / a0,
    }
}

/// Notch coefficients at the given center frequency.
pub fn notch_coefficients(frequency: f32, q: f32, sample_rate: f32) -> BiquadCoeffs {
    let w0 = omega(frequency, sample_rate);
    let (sin_w0, cos_w0) = (sinf(w0), cosf(w0));
    let alpha = sin_w0 / (2.0 * q.max(0.01));

    let a0 = 1.0 + alpha;
    BiquadCoeffs {
        b0: 1.0 / a0,
        b1: -2.0 * cos_w0 / a0,
        b2: 1.0 / a0,
        a1: -2.0 * cos_w0 / a0,
        a2: (1.0 - alpha) / a0,
    }
}

/// Peaking EQ coefficients with the given boost/cut in dB.
pub fn peaking_eq_coefficients(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> BiquadCoeffs {
    let big_a = powf(10.0, gain_db / 40.0);
    let w0 = omega(frequency, sample_rate);
    let (sin_w0, cos_w0) = (sinf(w0), cosf(w0));
    let alpha = sin_w0 / (2.0 * q.max(0.01));

    let a0 = 1.0 + alpha / big_a;
    BiquadCoeffs {
        b0: (1.0 + alpha * big_a) / a0,
        b1: -2.0 * cos_w0 / a0,
        b2: (1.0 - alpha * big_a) / a0,
        a1: -2.0 * cos_w0 / a0,
        a2: (1.0 - alpha / big_a) / a0,
    }
}

/// A single biquad section in transposed direct form II.
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: BiquadCoeffs,
    z1: f32,
    z2: f32,
}

impl Biquad {
    /// Create a section with the given coefficients.
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Replace the coefficients, keeping the filter state.
    pub fn set_coefficients(&mut self, coeffs: BiquadCoeffs) {
        self.coeffs = coeffs;
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> BiquadCoeffs {
        self.coeffs
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let output = c.b0 * input + self.z1;
        self.z1 = flush_denormal(c.b1 * input - c.a1 * output + self.z2);
        self.z2 = flush_denormal(c.b2 * input - c.a2 * output);
        output
    }

    /// Zero the filter state.
    pub fn clear(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new(BiquadCoeffs::IDENTITY)
    }
}
