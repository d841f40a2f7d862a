//! Multi-stage phaser.
//!
//! A chain of first-order allpass sections sharing one coefficient that is
//! recomputed every sample from an LFO-swept center frequency, plus a
//! feedback path from the chain's tail to its head. Unlike the reverb's
//! delay-buffer allpasses, these are coefficient-form sections derived from
//! the bilinear transform, so the notch positions track the sweep exactly.

use libm::tanf;
use matiz_core::{AudioBuffer, Lfo, flush_denormal, knee_clip, wet_dry_mix};

use crate::error::{EffectError, check_param};
use crate::render::{PROGRESS_CHUNK, Progress, Render, check_render_input};

/// One first-order allpass section, `y[n] = -a*x[n] + x[n-1] + a*y[n-1]`.
#[derive(Debug, Clone, Copy, Default)]
struct AllpassStage {
    x1: f32,
    y1: f32,
}

impl AllpassStage {
    #[inline]
    fn process(&mut self, coeff: f32, x: f32) -> f32 {
        let y = -coeff * x + self.x1 + coeff * self.y1;
        self.x1 = x;
        self.y1 = flush_denormal(y);
        y
    }
}

/// Allpass coefficient for a given corner frequency.
#[inline]
fn stage_coeff(frequency: f32, sample_rate: f32) -> f32 {
    let t = tanf(core::f32::consts::PI * frequency / sample_rate);
    (1.0 - t) / (1.0 + t)
}

/// Phaser parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Phaser {
    /// Number of allpass stages, even, 2-12.
    pub stages: u32,
    /// LFO rate in Hz, 0.05-5.
    pub rate: f32,
    /// Bottom of the sweep in Hz, 100-2000.
    pub min_freq: f32,
    /// Top of the sweep in Hz, 500-8000. Must exceed `min_freq`.
    pub max_freq: f32,
    /// Feedback gain, 0-0.9.
    pub feedback: f32,
    /// Wet/dry mix, 0-100.
    pub wet_dry: f32,
}

impl Default for Phaser {
    fn default() -> Self {
        Self {
            stages: 4,
            rate: 0.5,
            min_freq: 440.0,
            max_freq: 1600.0,
            feedback: 0.5,
            wet_dry: 50.0,
        }
    }
}

impl Render for Phaser {
    fn name(&self) -> &'static str {
        "phaser"
    }

    fn validate(&self) -> Result<(), EffectError> {
        check_param("phaser", "stages", self.stages as f32, 2.0, 12.0)?;
        if self.stages % 2 != 0 {
            return Err(EffectError::InvalidParameter {
                effect: "phaser",
                param: "stages",
                value: self.stages as f32,
                expected: "an even count".into(),
            });
        }
        check_param("phaser", "rate", self.rate, 0.05, 5.0)?;
        check_param("phaser", "min_freq", self.min_freq, 100.0, 2000.0)?;
        check_param("phaser", "max_freq", self.max_freq, 500.0, 8000.0)?;
        if self.max_freq <= self.min_freq {
            return Err(EffectError::InvalidParameter {
                effect: "phaser",
                param: "max_freq",
                value: self.max_freq,
                expected: format!("greater than min_freq ({})", self.min_freq),
            });
        }
        check_param("phaser", "feedback", self.feedback, 0.0, 0.9)?;
        check_param("phaser", "wet_dry", self.wet_dry, 0.0, 100.0)
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

        let freq_span = self.max_freq - self.min_freq;
        let wet = self.wet_dry / 100.0;

        let mut output = Vec::with_capacity(num_channels);
        for (ch_index, samples) in input.channels().enumerate() {
            let mut stages = vec![AllpassStage::default(); self.stages as usize];
            let mut lfo = Lfo::new(self.rate, 0.0, sample_rate);
            let mut last_out = 0.0f32;

            let status = format!("phaser: channel {}/{}", ch_index + 1, num_channels);
            let mut out = vec![0.0f32; len];
            for (n, &x) in samples.iter().enumerate() {
                let sweep_freq = self.min_freq + lfo.next_unipolar() * freq_span;
                let coeff = stage_coeff(sweep_freq.min(sample_rate * 0.45), sample_rate);

                let mut y = x + last_out * self.feedback;
                for stage in &mut stages {
                    y = stage.process(coeff, y);
                }
                last_out = y;

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
