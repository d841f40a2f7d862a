//! Flanger with feedback.
//!
//! A single short modulated delay per channel, with the delayed output fed
//! back into the line. The feedback turns the moving comb notches into
//! sharp resonant peaks, the metallic "jet" sound that separates a flanger
//! from a chorus. Stereo channels differ only by LFO phase.

use matiz_core::{AudioBuffer, DelayLine, Lfo, knee_clip, ms_to_samples, wet_dry_mix};

use crate::error::{EffectError, check_param};
use crate::render::{PROGRESS_CHUNK, Progress, Render, check_render_input};

/// Flanger parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Flanger {
    /// LFO rate in Hz, 0.05-5.
    pub rate: f32,
    /// Modulation depth, 0-100, as a fraction of the base delay.
    pub depth: f32,
    /// Feedback gain, 0-0.9.
    pub feedback: f32,
    /// Center delay in milliseconds, 0.5-15.
    pub base_delay_ms: f32,
    /// LFO phase offset of the second channel, 0-180 degrees.
    pub stereo_phase_deg: f32,
    /// Wet/dry mix, 0-100.
    pub wet_dry: f32,
}

impl Default for Flanger {
    fn default() -> Self {
        Self {
            rate: 0.25,
            depth: 70.0,
            feedback: 0.5,
            base_delay_ms: 5.0,
            stereo_phase_deg: 90.0,
            wet_dry: 50.0,
        }
    }
}

impl Render for Flanger {
    fn name(&self) -> &'static str {
        "flanger"
    }

    fn validate(&self) -> Result<(), EffectError> {
        check_param("flanger", "rate", self.rate, 0.05, 5.0)?;
        check_param("flanger", "depth", self.depth, 0.0, 100.0)?;
        check_param("flanger", "feedback", self.feedback, 0.0, 0.9)?;
        check_param("flanger", "base_delay_ms", self.base_delay_ms, 0.5, 15.0)?;
        check_param(
            "flanger",
            "stereo_phase_deg",
            self.stereo_phase_deg,
            0.0,
            180.0,
        )?;
        check_param("flanger", "wet_dry", self.wet_dry, 0.0, 100.0)
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

        let base_samples = ms_to_samples(self.base_delay_ms, sample_rate);
        let mod_samples = self.depth / 100.0 * base_samples;
        let capacity = (base_samples + mod_samples).ceil() as usize + 2;
        let wet = self.wet_dry / 100.0;

        let mut output = Vec::with_capacity(num_channels);
        for (ch_index, samples) in input.channels().enumerate() {
            let phase = if ch_index == 0 {
                0.0
            } else {
                self.stereo_phase_deg.to_radians()
            };
            let mut lfo = Lfo::new(self.rate, phase, sample_rate);
            let mut line = DelayLine::new(capacity);

            let status = format!("flanger: channel {}/{}", ch_index + 1, num_channels);
            let mut out = vec![0.0f32; len];
            for (n, &x) in samples.iter().enumerate() {
                let offset = base_samples + mod_samples * lfo.next() * 0.5;
                let delayed = line.read(offset);
                line.write(x + delayed * self.feedback);
                out[n] = knee_clip(wet_dry_mix(x, delayed, wet));

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

#[cfg(test)]
mod tests {
    use super::*;

    fn noise_buffer(channels: usize, len: usize) -> AudioBuffer {
        // Deterministic pseudo-noise, loud enough to excite the notches.
        let data: Vec<Vec<f32>> = (0..channels)
            .map(|ch| {
                (0..len)
                    .map(|n| libm::sinf((n * 7919 + ch * 104729) as f32 * 0.7) * 0.6)
                    .collect()
            })
            .collect();
        AudioBuffer::new(44100, data).unwrap()
    }

    #[test]
    fn test_preserves_length() {
        let out = Flanger::default().apply(&noise_buffer(2, 5000)).unwrap();
        assert_eq!(out.len(), 5000);
        assert_eq!(out.num_channels(), 2);
    }

    #[test]
    fn test_dry_mix_is_identity() {
        let flanger = Flanger {
            wet_dry: 0.0,
            ..Flanger::default()
        };
        let input = noise_buffer(1, 2000);
        let out = flanger.apply(&input).unwrap();
        for (a, b) in out.channel(0).iter().zip(input.channel(0)) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_stereo_phase_decorrelates_channels() {
        let flanger = Flanger {
            stereo_phase_deg: 180.0,
            wet_dry: 100.0,
            ..Flanger::default()
        };
        // Identical content on both channels.
        let mono = noise_buffer(1, 8000);
        let data = mono.channel(0).to_vec();
        let input = AudioBuffer::new(44100, vec![data.clone(), data]).unwrap();
        let out = flanger.apply(&input).unwrap();
        let diff: f32 = out
            .channel(0)
            .iter()
            .zip(out.channel(1))
            .map(|(a, b)| (a - b).abs())
            .sum();
        assert!(diff > 0.1, "phase offset had no effect");
    }

    #[test]
    fn test_output_bounded_at_max_feedback() {
        let square: Vec<f32> = (0..16384).map(|n| if (n / 16) % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let input = AudioBuffer::new(44100, vec![square]).unwrap();
        let flanger = Flanger {
            feedback: 0.9,
            depth: 100.0,
            wet_dry: 100.0,
            ..Flanger::default()
        };
        let out = flanger.apply(&input).unwrap();
        for &s in out.channel(0) {
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn test_rejects_runaway_feedback() {
        let flanger = Flanger {
            feedback: 1.0,
            ..Flanger::default()
        };
        assert!(matches!(
            flanger.validate(),
            Err(EffectError::InvalidParameter { param: "feedback", .. })
        ));
    }
}
