//! Ten-band graphic equalizer.
//!
//! Fixed ISO-style center frequencies, one peaking biquad per band, applied
//! in series. Bands sitting at exactly 0 dB are skipped, which keeps the
//! all-flat setting a bit-exact identity and spares the cascade pointless
//! floating-point drift.

use matiz_core::{AudioBuffer, Biquad, knee_clip, peaking_eq_coefficients};

use crate::error::{EffectError, check_param};
use crate::render::{PROGRESS_CHUNK, Progress, Render, check_render_input};

/// Band center frequencies in Hz.
pub const BAND_FREQUENCIES: [f32; 10] = [
    31.0, 62.0, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0, 16000.0,
];

/// Gain limits per band in dB.
pub const MAX_BAND_GAIN_DB: f32 = 12.0;

const BAND_Q: f32 = 1.0;

/// Graphic equalizer parameters: one gain per band in dB, -12 to +12.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Equalizer {
    /// Per-band gains in dB, low to high.
    pub gains_db: [f32; 10],
}

impl Render for Equalizer {
    fn name(&self) -> &'static str {
        "equalizer"
    }

    fn validate(&self) -> Result<(), EffectError> {
        for &gain in &self.gains_db {
            check_param(
                "equalizer",
                "gains_db",
                gain,
                -MAX_BAND_GAIN_DB,
                MAX_BAND_GAIN_DB,
            )?;
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

        // Bands at exactly 0 dB contribute nothing; leave them out entirely.
        let active: Vec<(f32, f32)> = BAND_FREQUENCIES
            .iter()
            .copied()
            .zip(self.gains_db.iter().copied())
            .filter(|&(freq, gain)| gain != 0.0 && freq < sample_rate / 2.0)
            .collect();

        let mut output = Vec::with_capacity(num_channels);
        for (ch_index, samples) in input.channels().enumerate() {
            let status = format!("equalizer: channel {}/{}", ch_index + 1, num_channels);
            if active.is_empty() {
                progress.step(len as u64, &status);
                output.push(samples.to_vec());
                continue;
            }

            let mut bands: Vec<Biquad> = active
                .iter()
                .map(|&(freq, gain)| {
                    Biquad::new(peaking_eq_coefficients(freq, BAND_Q, gain, sample_rate))
                })
                .collect();

            let mut out = vec![0.0f32; len];
            for (n, &x) in samples.iter().enumerate() {
                let mut y = x;
                for band in &mut bands {
                    y = band.process(y);
                }
                out[n] = knee_clip(y);

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

    fn sine_buffer(freq: f32, len: usize) -> AudioBuffer {
        // Quiet enough that a +12 dB boost stays inside the clip knee.
        let data: Vec<f32> = (0..len)
            .map(|n| 0.2 * libm::sinf(2.0 * core::f32::consts::PI * freq * n as f32 / 44100.0))
            .collect();
        AudioBuffer::new(44100, vec![data]).unwrap()
    }

    #[test]
    fn test_flat_settings_are_bit_exact_identity() {
        let input = sine_buffer(440.0, 4096);
        let out = Equalizer::default().apply(&input).unwrap();
        assert_eq!(out.channel(0), input.channel(0));
    }

    #[test]
    fn test_boost_raises_level_at_band_center() {
        let mut eq = Equalizer::default();
        eq.gains_db[5] = 12.0; // 1 kHz
        let input = sine_buffer(1000.0, 44100);
        let out = eq.apply(&input).unwrap();
        let gain = out.rms() / input.rms();
        let expected = libm::powf(10.0, 12.0 / 20.0);
        assert!((gain - expected).abs() / expected < 0.1, "gain {gain}");
    }

    #[test]
    fn test_cut_lowers_level_at_band_center() {
        let mut eq = Equalizer::default();
        eq.gains_db[5] = -12.0;
        let input = sine_buffer(1000.0, 44100);
        let out = eq.apply(&input).unwrap();
        assert!(out.rms() < input.rms() * 0.5);
    }

    #[test]
    fn test_distant_band_leaves_level_alone() {
        let mut eq = Equalizer::default();
        eq.gains_db[0] = 12.0; // 31 Hz should not move a 4 kHz tone
        let input = sine_buffer(4000.0, 44100);
        let out = eq.apply(&input).unwrap();
        let gain = out.rms() / input.rms();
        assert!((gain - 1.0).abs() < 0.05, "gain {gain}");
    }

    #[test]
    fn test_preserves_length_and_channels() {
        let input = AudioBuffer::new(44100, vec![vec![0.1; 1000], vec![0.2; 1000]]).unwrap();
        let mut eq = Equalizer::default();
        eq.gains_db[3] = 6.0;
        let out = eq.apply(&input).unwrap();
        assert_eq!(out.len(), 1000);
        assert_eq!(out.num_channels(), 2);
    }

    #[test]
    fn test_rejects_excess_gain() {
        let eq = Equalizer {
            gains_db: [0.0, 0.0, 0.0, 13.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        };
        assert!(eq.validate().is_err());
    }
}
