//! Downward compressor and expander.
//!
//! Both work in the dB domain: track the input level with an attack/release
//! envelope follower, compute a gain offset from threshold and ratio, and
//! apply it as a linear multiplier. The follower's asymmetric smoothing is
//! what gives the gain its attack and release behavior. The compressor adds
//! makeup gain and a final knee clip; the expander instead normalizes the
//! whole output when it would exceed full scale.

use matiz_core::{AudioBuffer, EnvelopeFollower, db_to_linear, knee_clip, linear_to_db};

use crate::error::{EffectError, check_param};
use crate::render::{PROGRESS_CHUNK, Progress, Render, check_render_input};

/// Downward compressor parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Compressor {
    /// Threshold in dBFS, -60 to 0.
    pub threshold_db: f32,
    /// Compression ratio, 1-20.
    pub ratio: f32,
    /// Soft knee width in dB, 0-24. 0 is a hard knee.
    pub knee_db: f32,
    /// Attack time in ms, 0.1-500.
    pub attack_ms: f32,
    /// Release time in ms, 1-2000.
    pub release_ms: f32,
    /// Makeup gain in dB, 0-24.
    pub makeup_db: f32,
}

impl Default for Compressor {
    fn default() -> Self {
        Self {
            threshold_db: -18.0,
            ratio: 4.0,
            knee_db: 6.0,
            attack_ms: 10.0,
            release_ms: 100.0,
            makeup_db: 0.0,
        }
    }
}

impl Compressor {
    /// Gain reduction in dB for a detected level, with quadratic soft knee.
    fn reduction_db(&self, level_db: f32) -> f32 {
        let over = level_db - self.threshold_db;
        let slope = 1.0 - 1.0 / self.ratio;
        let half_knee = self.knee_db / 2.0;
        if self.knee_db > 0.0 && over.abs() <= half_knee {
            let t = over + half_knee;
            slope * t * t / (2.0 * self.knee_db)
        } else if over > 0.0 {
            slope * over
        } else {
            0.0
        }
    }
}

impl Render for Compressor {
    fn name(&self) -> &'static str {
        "compressor"
    }

    fn validate(&self) -> Result<(), EffectError> {
        check_param("compressor", "threshold_db", self.threshold_db, -60.0, 0.0)?;
        check_param("compressor", "ratio", self.ratio, 1.0, 20.0)?;
        check_param("compressor", "knee_db", self.knee_db, 0.0, 24.0)?;
        check_param("compressor", "attack_ms", self.attack_ms, 0.1, 500.0)?;
        check_param("compressor", "release_ms", self.release_ms, 1.0, 2000.0)?;
        check_param("compressor", "makeup_db", self.makeup_db, 0.0, 24.0)
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

        let makeup = db_to_linear(self.makeup_db);

        let mut output = Vec::with_capacity(num_channels);
        for (ch_index, samples) in input.channels().enumerate() {
            let mut detector =
                EnvelopeFollower::new(self.attack_ms, self.release_ms, sample_rate);

            let status = format!("compressor: channel {}/{}", ch_index + 1, num_channels);
            let mut out = vec![0.0f32; len];
            for (n, &x) in samples.iter().enumerate() {
                let level_db = linear_to_db(detector.process(x));
                let reduction = self.reduction_db(level_db);
                out[n] = knee_clip(x * db_to_linear(-reduction) * makeup);

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

/// Downward expander parameters.
///
/// The mirror image of the compressor: content whose detected level falls
/// *below* the threshold is pushed further down by
/// `(threshold - level) * (1 - 1/ratio)` dB. Instead of makeup gain, a
/// final pass rescales the whole buffer by `1/peak` if any sample ended up
/// beyond full scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Expander {
    /// Threshold in dBFS, -60 to 0.
    pub threshold_db: f32,
    /// Expansion ratio, 1-20.
    pub ratio: f32,
    /// Attack time in ms, 0.1-500.
    pub attack_ms: f32,
    /// Release time in ms, 1-2000.
    pub release_ms: f32,
}

impl Default for Expander {
    fn default() -> Self {
        Self {
            threshold_db: -40.0,
            ratio: 2.0,
            attack_ms: 5.0,
            release_ms: 50.0,
        }
    }
}

impl Expander {
    fn attenuation_db(&self, level_db: f32) -> f32 {
        let under = self.threshold_db - level_db;
        if under > 0.0 {
            under * (1.0 - 1.0 / self.ratio)
        } else {
            0.0
        }
    }
}

impl Render for Expander {
    fn name(&self) -> &'static str {
        "expander"
    }

    fn validate(&self) -> Result<(), EffectError> {
        check_param("expander", "threshold_db", self.threshold_db, -60.0, 0.0)?;
        check_param("expander", "ratio", self.ratio, 1.0, 20.0)?;
        check_param("expander", "attack_ms", self.attack_ms, 0.1, 500.0)?;
        check_param("expander", "release_ms", self.release_ms, 1.0, 2000.0)
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

        let mut output = Vec::with_capacity(num_channels);
        for (ch_index, samples) in input.channels().enumerate() {
            let mut detector =
                EnvelopeFollower::new(self.attack_ms, self.release_ms, sample_rate);

            let status = format!("expander: channel {}/{}", ch_index + 1, num_channels);
            let mut out = vec![0.0f32; len];
            for (n, &x) in samples.iter().enumerate() {
                let level_db = linear_to_db(detector.process(x));
                let attenuation = self.attenuation_db(level_db);
                out[n] = x * db_to_linear(-attenuation);

                if n % PROGRESS_CHUNK == PROGRESS_CHUNK - 1 {
                    progress.step(PROGRESS_CHUNK as u64, &status);
                }
            }
            progress.step((len % PROGRESS_CHUNK) as u64, &status);
            output.push(out);
        }

        // Safety rescale instead of clipping: expansion only attenuates, so
        // this fires only when the input itself was already over full scale.
        let peak = output
            .iter()
            .flat_map(|ch| ch.iter())
            .fold(0.0f32, |acc, s| acc.max(s.abs()));
        if peak > 1.0 {
            let scale = 1.0 / peak;
            for ch in &mut output {
                for s in ch {
                    *s *= scale;
                }
            }
        }

        Ok(AudioBuffer::new(input.sample_rate(), output).expect("channels share len"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 44100;

    fn sine_buffer(amplitude: f32, len: usize) -> AudioBuffer {
        let data: Vec<f32> = (0..len)
            .map(|n| {
                amplitude * libm::sinf(2.0 * core::f32::consts::PI * 440.0 * n as f32 / 44100.0)
            })
            .collect();
        AudioBuffer::new(SR, vec![data]).unwrap()
    }

    #[test]
    fn test_below_threshold_untouched() {
        let comp = Compressor {
            threshold_db: -24.0,
            ratio: 4.0,
            knee_db: 0.0,
            makeup_db: 0.0,
            ..Compressor::default()
        };
        // -26 dBFS sine sits below the threshold; no knee, so zero reduction.
        let input = sine_buffer(0.05, 8192);
        let out = comp.apply(&input).unwrap();
        for (a, b) in out.channel(0).iter().zip(input.channel(0)) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_above_threshold_attenuated_by_slope() {
        // Level settles at -6 dBFS, threshold -24, ratio 4:1 -> reduction
        // of (18 dB) * (1 - 1/4) = 13.5 dB once the detector has settled.
        let comp = Compressor {
            threshold_db: -24.0,
            ratio: 4.0,
            knee_db: 0.0,
            attack_ms: 0.1,
            release_ms: 2000.0,
            makeup_db: 0.0,
        };
        let amplitude = db_to_linear(-6.0);
        let input = sine_buffer(amplitude, 44100);
        let out = comp.apply(&input).unwrap();
        let expected_peak = amplitude * db_to_linear(-13.5);
        let peak = out.channel(0)[22050..].iter().fold(0.0f32, |a, s| a.max(s.abs()));
        assert!(
            (peak - expected_peak).abs() / expected_peak < 0.1,
            "peak {peak}, expected {expected_peak}"
        );
    }

    #[test]
    fn test_makeup_gain_applied() {
        let comp = Compressor {
            makeup_db: 6.0,
            threshold_db: -60.0,
            ratio: 1.0,
            knee_db: 0.0,
            ..Compressor::default()
        };
        // Ratio 1 means no reduction; only makeup remains.
        let input = sine_buffer(0.1, 4096);
        let out = comp.apply(&input).unwrap();
        let gain = out.rms() / input.rms();
        let expected = db_to_linear(6.0);
        assert!((gain - expected).abs() / expected < 0.02, "gain {gain}");
    }

    #[test]
    fn test_soft_knee_blends_near_threshold() {
        let hard = Compressor {
            threshold_db: -24.0,
            ratio: 8.0,
            knee_db: 0.0,
            ..Compressor::default()
        };
        let soft = Compressor {
            knee_db: 12.0,
            ..hard.clone()
        };
        // At the threshold itself the hard knee does nothing, the soft knee
        // already reduces by slope * (knee/2)^2 / (2*knee) dB.
        assert_eq!(hard.reduction_db(-24.0), 0.0);
        let expected = (1.0 - 1.0 / 8.0) * 6.0f32.powi(2) / 24.0;
        assert!((soft.reduction_db(-24.0) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_compressor_output_bounded() {
        let comp = Compressor {
            makeup_db: 24.0,
            ..Compressor::default()
        };
        let square: Vec<f32> = (0..8192).map(|n| if (n / 64) % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let input = AudioBuffer::new(SR, vec![square]).unwrap();
        let out = comp.apply(&input).unwrap();
        for &s in out.channel(0) {
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn test_expander_attenuates_quiet_passages() {
        let expander = Expander {
            threshold_db: -20.0,
            ratio: 4.0,
            ..Expander::default()
        };
        let quiet = sine_buffer(db_to_linear(-40.0), 44100);
        let loud = sine_buffer(db_to_linear(-6.0), 44100);
        let quiet_out = expander.apply(&quiet).unwrap();
        let loud_out = expander.apply(&loud).unwrap();
        // Quiet content is pushed down about 15 dB, loud content passes.
        assert!(quiet_out.rms() < quiet.rms() * 0.5);
        assert!((loud_out.peak() - loud.peak()).abs() / loud.peak() < 0.05);
    }

    #[test]
    fn test_expander_normalizes_overs() {
        let expander = Expander::default();
        let input = AudioBuffer::new(SR, vec![vec![1.5; 1024]]).unwrap();
        let out = expander.apply(&input).unwrap();
        assert!(out.peak() <= 1.0 + 1e-6);
    }

    #[test]
    fn test_rejects_positive_threshold() {
        let comp = Compressor {
            threshold_db: 3.0,
            ..Compressor::default()
        };
        assert!(comp.validate().is_err());
    }
}
