//! Static filters: resonant lowpass and depth-blended notch.

use matiz_core::{
    AudioBuffer, Biquad, knee_clip, lowpass_coefficients, notch_coefficients, wet_dry_mix,
};

use crate::error::{EffectError, check_param};
use crate::render::{PROGRESS_CHUNK, Progress, Render, check_render_input};

const BUTTERWORTH_Q: f32 = core::f32::consts::FRAC_1_SQRT_2;
const MAX_RESONANCE_Q: f32 = 10.0;

/// Supported lowpass slopes in dB/octave.
pub const LOWPASS_SLOPES: [u32; 6] = [6, 12, 18, 24, 36, 48];

/// Resonant lowpass with selectable slope.
///
/// Steeper slopes cascade biquad sections (`ceil((slope/6)/2)` of them).
/// The resonance Q is applied to the final section only, the earlier ones
/// stay at Butterworth Q, so the resonant peak is not compounded per stage.
#[derive(Debug, Clone, PartialEq)]
pub struct LowPass {
    /// Cutoff frequency in Hz, 20-20000 (and below Nyquist).
    pub cutoff: f32,
    /// Resonance, 0-100, mapped to Q 0.707-10 on the final section.
    pub resonance: f32,
    /// Slope in dB/octave, one of 6, 12, 18, 24, 36, 48.
    pub slope: u32,
    /// Wet/dry mix, 0-100.
    pub wet_dry: f32,
}

impl Default for LowPass {
    fn default() -> Self {
        Self {
            cutoff: 1000.0,
            resonance: 0.0,
            slope: 12,
            wet_dry: 100.0,
        }
    }
}

impl LowPass {
    fn num_sections(&self) -> usize {
        let order = (self.slope / 6) as usize;
        order.div_ceil(2)
    }

    fn resonance_q(&self) -> f32 {
        BUTTERWORTH_Q + self.resonance / 100.0 * (MAX_RESONANCE_Q - BUTTERWORTH_Q)
    }
}

impl Render for LowPass {
    fn name(&self) -> &'static str {
        "lowpass"
    }

    fn validate(&self) -> Result<(), EffectError> {
        check_param("lowpass", "cutoff", self.cutoff, 20.0, 20000.0)?;
        check_param("lowpass", "resonance", self.resonance, 0.0, 100.0)?;
        check_param("lowpass", "wet_dry", self.wet_dry, 0.0, 100.0)?;
        if !LOWPASS_SLOPES.contains(&self.slope) {
            return Err(EffectError::InvalidParameter {
                effect: "lowpass",
                param: "slope",
                value: self.slope as f32,
                expected: "one of 6, 12, 18, 24, 36, 48".into(),
            });
        }
        Ok(())
    }

    fn render(
        &self,
        input: &AudioBuffer,
        progress: &mut Progress<'_>,
    ) -> Result<AudioBuffer, EffectError> {
        check_render_input(self, input)?;

        let sample_rate = input.sample_rate() as f32;
        let cutoff = self.cutoff.min(sample_rate * 0.45);
        let num_channels = input.num_channels();
        let len = input.len();
        progress.begin(num_channels as u64 * len as u64);

        let sections = self.num_sections();
        let wet = self.wet_dry / 100.0;

        let mut output = Vec::with_capacity(num_channels);
        for (ch_index, samples) in input.channels().enumerate() {
            let mut cascade: Vec<Biquad> = (0..sections)
                .map(|s| {
                    let q = if s == sections - 1 {
                        self.resonance_q()
                    } else {
                        BUTTERWORTH_Q
                    };
                    Biquad::new(lowpass_coefficients(cutoff, q, sample_rate))
                })
                .collect();

            let status = format!("lowpass: channel {}/{}", ch_index + 1, num_channels);
            let mut out = vec![0.0f32; len];
            for (n, &x) in samples.iter().enumerate() {
                let mut y = x;
                for section in &mut cascade {
                    y = section.process(y);
                }
                out[n] = knee_clip(wet_dry_mix(x, y, wet));

                if n % PROGRESS_CHUNK == PROGRESS_CHUNK - 1 {
                    progress.step(PROGRESS_CHUNK as u64, &status);
                }
            }
            progress.step((len % PROGRESS_CHUNK) as u64, &status);
            output.push(out);
        }

        Ok(AudioBuffer::new(input.sample_rate(), output).expect("channels share len"))
    }
}

/// Notch filter with a depth control.
///
/// `depth` blends between the dry signal (0) and the fully notched signal
/// (100) before the overall wet/dry mix, so partial settings attenuate the
/// center frequency instead of removing it outright.
#[derive(Debug, Clone, PartialEq)]
pub struct Notch {
    /// Center frequency in Hz, 20-20000.
    pub center: f32,
    /// Filter Q, 0.1-30.
    pub q: f32,
    /// Notch depth, 0-100.
    pub depth: f32,
    /// Wet/dry mix, 0-100.
    pub wet_dry: f32,
}

impl Default for Notch {
    fn default() -> Self {
        Self {
            center: 1000.0,
            q: 5.0,
            depth: 100.0,
            wet_dry: 100.0,
        }
    }
}

impl Render for Notch {
    fn name(&self) -> &'static str {
        "notch"
    }

    fn validate(&self) -> Result<(), EffectError> {
        check_param("notch", "center", self.center, 20.0, 20000.0)?;
        check_param("notch", "q", self.q, 0.1, 30.0)?;
        check_param("notch", "depth", self.depth, 0.0, 100.0)?;
        check_param("notch", "wet_dry", self.wet_dry, 0.0, 100.0)
    }

    fn render(
        &self,
        input: &AudioBuffer,
        progress: &mut Progress<'_>,
    ) -> Result<AudioBuffer, EffectError> {
        check_render_input(self, input)?;

        let sample_rate = input.sample_rate() as f32;
        let center = self.center.min(sample_rate * 0.45);
        let num_channels = input.num_channels();
        let len = input.len();
        progress.begin(num_channels as u64 * len as u64);

        let depth = self.depth / 100.0;
        let wet = self.wet_dry / 100.0;

        let mut output = Vec::with_capacity(num_channels);
        for (ch_index, samples) in input.channels().enumerate() {
            let mut filter = Biquad::new(notch_coefficients(center, self.q, sample_rate));

            let status = format!("notch: channel {}/{}", ch_index + 1, num_channels);
            let mut out = vec![0.0f32; len];
            for (n, &x) in samples.iter().enumerate() {
                let notched = filter.process(x);
                let blended = wet_dry_mix(x, notched, depth);
                out[n] = knee_clip(wet_dry_mix(x, blended, wet));

                if n % PROGRESS_CHUNK == PROGRESS_CHUNK - 1 {
                    progress.step(PROGRESS_CHUNK as u64, &status);
                }
            }
            progress.step((len % PROGRESS_CHUNK) as u64, &status);
            output.push(out);
        }

        Ok(AudioBuffer::new(input.sample_rate(), output).expect("channels share len"))
    }
}
