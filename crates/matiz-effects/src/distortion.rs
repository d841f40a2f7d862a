//! Waveshaping distortion.
//!
//! Five memoryless transfer curves behind one drive control, followed by a
//! one-pole tone filter (lowpass/highpass blend) and a final tanh safety
//! clip. The bit crusher is the only mode with memory: its sample-hold
//! counter implements the rate reduction.

use libm::{expf, roundf};
use matiz_core::{AudioBuffer, OnePole, knee_clip, soft_clip, wet_dry_mix};

use crate::error::{EffectError, check_param};
use crate::render::{PROGRESS_CHUNK, Progress, Render, check_render_input};

/// Cutoff of the one-pole used by the tone control.
const TONE_CUTOFF_HZ: f32 = 800.0;

const HARD_CLIP_THRESHOLD: f32 = 0.5;

/// Transfer curve selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistortionMode {
    /// Smooth tanh saturation.
    SoftClip,
    /// Clamp at a threshold, then rescale back to full amplitude.
    HardClip,
    /// Cubic soft saturation with a gentle onset.
    Overdrive,
    /// Exponential saturation, asymmetric between half-waves.
    Fuzz,
    /// Quantize to `2^bits` levels and hold each value for `downsample`
    /// samples.
    BitCrush {
        /// Bit depth, 1-16.
        bits: u32,
        /// Sample-hold factor, 1-50. 1 means no rate reduction.
        downsample: u32,
    },
}

/// Distortion parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Distortion {
    /// Transfer curve.
    pub mode: DistortionMode,
    /// Linear input gain, 1-100.
    pub drive: f32,
    /// Tone, 0-100. 0 is fully lowpassed, 100 fully highpassed.
    pub tone: f32,
    /// Wet/dry mix, 0-100.
    pub wet_dry: f32,
}

impl Default for Distortion {
    fn default() -> Self {
        Self {
            mode: DistortionMode::SoftClip,
            drive: 10.0,
            tone: 50.0,
            wet_dry: 100.0,
        }
    }
}

fn shape(mode: DistortionMode, x: f32) -> f32 {
    match mode {
        DistortionMode::SoftClip => soft_clip(x),
        DistortionMode::HardClip => {
            x.clamp(-HARD_CLIP_THRESHOLD, HARD_CLIP_THRESHOLD) / HARD_CLIP_THRESHOLD
        }
        DistortionMode::Overdrive => {
            if x >= 1.0 {
                1.0
            } else if x <= -1.0 {
                -1.0
            } else {
                1.5 * (x - x * x * x / 3.0)
            }
        }
        DistortionMode::Fuzz => {
            // The negative half-wave saturates more gently, which is where
            // the buzz comes from.
            if x >= 0.0 {
                1.0 - expf(-x)
            } else {
                -(1.0 - expf(0.7 * x)) * 0.8
            }
        }
        DistortionMode::BitCrush { bits, .. } => {
            let half_levels = (1u32 << bits.clamp(1, 16).saturating_sub(1)).max(1) as f32;
            roundf(x.clamp(-1.0, 1.0) * half_levels) / half_levels
        }
    }
}

impl Render for Distortion {
    fn name(&self) -> &'static str {
        "distortion"
    }

    fn validate(&self) -> Result<(), EffectError> {
        check_param("distortion", "drive", self.drive, 1.0, 100.0)?;
        check_param("distortion", "tone", self.tone, 0.0, 100.0)?;
        check_param("distortion", "wet_dry", self.wet_dry, 0.0, 100.0)?;
        if let DistortionMode::BitCrush { bits, downsample } = self.mode {
            check_param("distortion", "bits", bits as f32, 1.0, 16.0)?;
            check_param("distortion", "downsample", downsample as f32, 1.0, 50.0)?;
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
        let num_channels = input.num_channels();
        let len = input.len();
        progress.begin(num_channels as u64 * len as u64);

        let wet = self.wet_dry / 100.0;
        let tone = self.tone / 100.0;
        let hold = match self.mode {
            DistortionMode::BitCrush { downsample, .. } => downsample.max(1) as usize,
            _ => 1,
        };

        let mut output = Vec::with_capacity(num_channels);
        for (ch_index, samples) in input.channels().enumerate() {
            let mut tone_lp = OnePole::new(TONE_CUTOFF_HZ, sample_rate);
            let mut held = 0.0f32;
            let mut hold_count = 0usize;

            let status = format!("distortion: channel {}/{}", ch_index + 1, num_channels);
            let mut out = vec![0.0f32; len];
            for (n, &x) in samples.iter().enumerate() {
                let shaped = if hold_count == 0 {
                    held = shape(self.mode, x * self.drive);
                    held
                } else {
                    held
                };
                hold_count = (hold_count + 1) % hold;

                let low = tone_lp.process(shaped);
                let high = shaped - low;
                // The tone highpass can overshoot; tanh tames the wet path
                // before the mix so a dry setting stays untouched.
                let toned = soft_clip(wet_dry_mix(low, high, tone));

                out[n] = knee_clip(wet_dry_mix(x, toned, wet));

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
