//! Schroeder reverb with tail extension.
//!
//! Eight parallel damped comb filters feed four series allpass diffusers,
//! the classic Freeverb topology. Comb delay lengths scale with room size
//! and sample rate; the second stereo channel's delays are offset by a few
//! samples to widen the image. The output buffer is longer than the input:
//! the decay time's worth of tail is appended and rendered from silence.

use matiz_core::{AllpassFilter, AudioBuffer, CombFilter, DelayLine, knee_clip, ms_to_samples};

use crate::error::{EffectError, check_param};
use crate::render::{PROGRESS_CHUNK, Progress, Render, check_render_input};

/// Comb delay lengths in samples at 44.1 kHz, tuned by ear.
const COMB_TUNINGS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Allpass delay lengths in samples at 44.1 kHz.
const ALLPASS_TUNINGS: [usize; 4] = [556, 441, 341, 225];

const ALLPASS_FEEDBACK: f32 = 0.5;

/// Maximum stereo delay offset in samples, scaled by `stereo_width`.
const MAX_STEREO_OFFSET: f32 = 23.0;

/// Schroeder reverb parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Reverb {
    /// Room size, 0-100. Scales the comb delay lengths.
    pub room_size: f32,
    /// Decay time in seconds, 0-10. Sets comb feedback and the tail length.
    pub decay_time: f32,
    /// Pre-delay before the reverb onset, 0-200 ms.
    pub pre_delay_ms: f32,
    /// High-frequency damping in the comb feedback paths, 0-100.
    pub damping: f32,
    /// Wet/dry mix, 0-100. 0 is fully dry.
    pub wet_dry: f32,
    /// Stereo width, 0-100. Offsets the second channel's delay lengths.
    pub stereo_width: f32,
}

impl Default for Reverb {
    fn default() -> Self {
        Self {
            room_size: 50.0,
            decay_time: 2.0,
            pre_delay_ms: 20.0,
            damping: 50.0,
            wet_dry: 40.0,
            stereo_width: 100.0,
        }
    }
}

impl Reverb {
    fn comb_feedback(&self) -> f32 {
        0.84 * (0.5 + (self.decay_time / 10.0) * 0.5)
    }

    fn stereo_offset(&self) -> usize {
        libm::roundf(MAX_STEREO_OFFSET * self.stereo_width / 100.0) as usize
    }
}

impl Render for Reverb {
    fn name(&self) -> &'static str {
        "reverb"
    }

    fn output_len(&self, input: &AudioBuffer) -> usize {
        input.len() + (self.decay_time * input.sample_rate() as f32) as usize
    }

    fn validate(&self) -> Result<(), EffectError> {
        check_param("reverb", "room_size", self.room_size, 0.0, 100.0)?;
        check_param("reverb", "decay_time", self.decay_time, 0.0, 10.0)?;
        check_param("reverb", "pre_delay_ms", self.pre_delay_ms, 0.0, 200.0)?;
        check_param("reverb", "damping", self.damping, 0.0, 100.0)?;
        check_param("reverb", "wet_dry", self.wet_dry, 0.0, 100.0)?;
        check_param("reverb", "stereo_width", self.stereo_width, 0.0, 100.0)
    }

    fn render(
        &self,
        input: &AudioBuffer,
        progress: &mut Progress<'_>,
    ) -> Result<AudioBuffer, EffectError> {
        check_render_input(self, input)?;

        let sample_rate = input.sample_rate() as f32;
        let out_len = self.output_len(input);
        let num_channels = input.num_channels();
        progress.begin(num_channels as u64 * out_len as u64);

        let sr_ratio = sample_rate / 44100.0;
        let size_scale = (0.5 + self.room_size / 100.0) * sr_ratio;
        let feedback = self.comb_feedback();
        let damping = self.damping / 100.0;
        let wet = self.wet_dry / 100.0;
        let stereo_offset = self.stereo_offset();
        let pre_samples = ms_to_samples(self.pre_delay_ms, sample_rate).round() as usize;

        let mut output = Vec::with_capacity(num_channels);
        for (ch_index, samples) in input.channels().enumerate() {
            // Only the second and later channels get the width offset.
            let offset = ch_index.min(1) * stereo_offset;

            let mut combs: Vec<CombFilter> = COMB_TUNINGS
                .iter()
                .map(|&base| {
                    let delay = (base as f32 * size_scale) as usize + offset;
                    CombFilter::new(delay.max(1), feedback, damping)
                })
                .collect();
            let mut allpasses: Vec<AllpassFilter> = ALLPASS_TUNINGS
                .iter()
                .map(|&base| {
                    let delay = (base as f32 * sr_ratio) as usize + offset;
                    AllpassFilter::new(delay.max(1), ALLPASS_FEEDBACK)
                })
                .collect();
            let mut pre_delay = (pre_samples > 0).then(|| DelayLine::new(pre_samples));

            let status = format!("reverb: channel {}/{}", ch_index + 1, num_channels);
            let mut out = vec![0.0f32; out_len];
            for n in 0..out_len {
                let dry = if n < samples.len() { samples[n] } else { 0.0 };

                let reverb_in = match pre_delay.as_mut() {
                    Some(line) => {
                        let delayed = line.read(pre_samples as f32);
                        line.write(dry);
                        delayed
                    }
                    None => dry,
                };

                let mut comb_sum = 0.0;
                for comb in &mut combs {
                    comb_sum += comb.process(reverb_in);
                }
                let mut wet_sample = comb_sum / COMB_TUNINGS.len() as f32;
                for allpass in &mut allpasses {
                    wet_sample = allpass.process(wet_sample);
                }

                out[n] = knee_clip(dry * (1.0 - wet) + wet_sample * wet);

                if n % PROGRESS_CHUNK == PROGRESS_CHUNK - 1 {
                    progress.step(PROGRESS_CHUNK as u64, &status);
                }
            }
            progress.step((out_len % PROGRESS_CHUNK) as u64, &status);
            output.push(out);
        }

        Ok(AudioBuffer::new(input.sample_rate(), output).expect("channels share out_len"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_buffer(channels: usize, len: usize) -> AudioBuffer {
        let mut data = vec![vec![0.0f32; len]; channels];
        for ch in &mut data {
            ch[0] = 0.5;
        }
        AudioBuffer::new(44100, data).unwrap()
    }

    #[test]
    fn test_output_length_includes_tail() {
        let reverb = Reverb {
            decay_time: 1.5,
            ..Reverb::default()
        };
        let input = impulse_buffer(2, 1000);
        let out = reverb.apply(&input).unwrap();
        assert_eq!(out.len(), 1000 + (1.5 * 44100.0) as usize);
        assert_eq!(out.num_channels(), 2);
    }

    #[test]
    fn test_tail_carries_energy() {
        let reverb = Reverb {
            decay_time: 1.0,
            wet_dry: 100.0,
            pre_delay_ms: 0.0,
            ..Reverb::default()
        };
        let input = impulse_buffer(1, 100);
        let out = reverb.apply(&input).unwrap();
        let tail = &out.channel(0)[100..];
        let tail_energy: f32 = tail.iter().map(|s| s * s).sum();
        assert!(tail_energy > 0.0, "reverb tail is silent");
    }

    #[test]
    fn test_dry_mix_passes_input() {
        let reverb = Reverb {
            wet_dry: 0.0,
            decay_time: 0.5,
            ..Reverb::default()
        };
        let input = impulse_buffer(1, 64);
        let out = reverb.apply(&input).unwrap();
        for n in 0..64 {
            assert!((out.channel(0)[n] - input.channel(0)[n]).abs() < 1e-6);
        }
        // Tail samples are pure wet at zero mix, so silent.
        for &s in &out.channel(0)[64..] {
            assert_eq!(s, 0.0);
        }
    }

    #[test]
    fn test_output_bounded_on_square_wave() {
        let square: Vec<f32> = (0..8192).map(|n| if (n / 64) % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let input = AudioBuffer::new(44100, vec![square]).unwrap();
        let reverb = Reverb {
            decay_time: 5.0,
            room_size: 100.0,
            wet_dry: 100.0,
            ..Reverb::default()
        };
        let out = reverb.apply(&input).unwrap();
        for &s in out.channel(0) {
            assert!((-1.0..=1.0).contains(&s), "sample {s} out of range");
        }
    }

    #[test]
    fn test_stereo_channels_decorrelated() {
        let reverb = Reverb {
            stereo_width: 100.0,
            wet_dry: 100.0,
            pre_delay_ms: 0.0,
            ..Reverb::default()
        };
        let input = impulse_buffer(2, 2000);
        let out = reverb.apply(&input).unwrap();
        let diff: f32 = out
            .channel(0)
            .iter()
            .zip(out.channel(1))
            .map(|(a, b)| (a - b).abs())
            .sum();
        assert!(diff > 0.0, "channels are identical despite stereo width");
    }

    #[test]
    fn test_pre_delay_shifts_onset() {
        let base = Reverb {
            pre_delay_ms: 0.0,
            wet_dry: 100.0,
            ..Reverb::default()
        };
        let delayed = Reverb {
            pre_delay_ms: 50.0,
            ..base.clone()
        };
        let input = impulse_buffer(1, 4000);
        let out_base = base.apply(&input).unwrap();
        let out_delayed = delayed.apply(&input).unwrap();

        let onset = |buf: &AudioBuffer| {
            buf.channel(0)
                .iter()
                .position(|s| s.abs() > 1e-6)
                .unwrap_or(usize::MAX)
        };
        let shift = onset(&out_delayed) as i64 - onset(&out_base) as i64;
        let expected = (0.05f32 * 44100.0).round() as i64;
        assert!(
            (shift - expected).abs() <= 1,
            "onset shifted by {shift}, expected {expected}"
        );
    }

    #[test]
    fn test_rejects_bad_decay() {
        let reverb = Reverb {
            decay_time: 11.0,
            ..Reverb::default()
        };
        assert!(matches!(
            reverb.validate(),
            Err(EffectError::InvalidParameter { param: "decay_time", .. })
        ));
    }

    #[test]
    fn test_rejects_empty_buffer() {
        let input = AudioBuffer::new(44100, vec![vec![]]).unwrap();
        assert!(matches!(
            Reverb::default().apply(&input),
            Err(EffectError::EmptyBuffer)
        ));
    }
}
