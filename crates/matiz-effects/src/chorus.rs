//! Multi-voice chorus.
//!
//! Each voice is its own interpolated delay line swept by its own LFO, with
//! the voice phases spread evenly around the circle so the detuned copies
//! never line up. Voice outputs are averaged and mixed against the dry
//! signal.

use matiz_core::{AudioBuffer, DelayLine, Lfo, knee_clip, ms_to_samples, wet_dry_mix};

use crate::error::{EffectError, check_param};
use crate::render::{PROGRESS_CHUNK, Progress, Render, check_render_input};

/// Maximum modulation swing in milliseconds at 100% depth.
const MAX_MOD_MS: f32 = 5.0;

/// Chorus parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Chorus {
    /// LFO rate in Hz, 0.05-10.
    pub rate: f32,
    /// Modulation depth, 0-100.
    pub depth: f32,
    /// Number of voices, 1-8.
    pub voices: u32,
    /// Center delay in milliseconds, 1-50.
    pub base_delay_ms: f32,
    /// Wet/dry mix, 0-100.
    pub wet_dry: f32,
}

impl Default for Chorus {
    fn default() -> Self {
        Self {
            rate: 0.8,
            depth: 50.0,
            voices: 3,
            base_delay_ms: 20.0,
            wet_dry: 50.0,
        }
    }
}

impl Chorus {
    /// Peak-to-peak modulation swing in samples.
    ///
    /// Capped so the bottom of the sweep (`base - swing/2`) never drops
    /// below a one sample delay; otherwise a short base delay at full depth
    /// would spend half of each LFO cycle pinned at the delay line's
    /// minimum read offset instead of sweeping.
    fn mod_swing(&self, sample_rate: f32) -> f32 {
        let base_samples = ms_to_samples(self.base_delay_ms, sample_rate);
        let swing = self.depth / 100.0 * ms_to_samples(MAX_MOD_MS, sample_rate);
        swing.min(2.0 * (base_samples - 1.0)).max(0.0)
    }
}

impl Render for Chorus {
    fn name(&self) -> &'static str {
        "chorus"
    }

    fn validate(&self) -> Result<(), EffectError> {
        check_param("chorus", "rate", self.rate, 0.05, 10.0)?;
        check_param("chorus", "depth", self.depth, 0.0, 100.0)?;
        check_param("chorus", "voices", self.voices as f32, 1.0, 8.0)?;
        check_param("chorus", "base_delay_ms", self.base_delay_ms, 1.0, 50.0)?;
        check_param("chorus", "wet_dry", self.wet_dry, 0.0, 100.0)
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

        let voices = self.voices as usize;
        let base_samples = ms_to_samples(self.base_delay_ms, sample_rate);
        let mod_samples = self.mod_swing(sample_rate);
        let capacity = (base_samples + mod_samples).ceil() as usize + 2;
        let wet = self.wet_dry / 100.0;

        let mut output = Vec::with_capacity(num_channels);
        for (ch_index, samples) in input.channels().enumerate() {
            let mut lines: Vec<DelayLine> =
                (0..voices).map(|_| DelayLine::new(capacity)).collect();
            let mut lfos: Vec<Lfo> = (0..voices)
                .map(|k| {
                    let phase = k as f32 * core::f32::consts::TAU / voices as f32;
                    Lfo::new(self.rate, phase, sample_rate)
                })
                .collect();

            let status = format!("chorus: channel {}/{}", ch_index + 1, num_channels);
            let mut out = vec![0.0f32; len];
            for (n, &x) in samples.iter().enumerate() {
                let mut voice_sum = 0.0;
                for (line, lfo) in lines.iter_mut().zip(lfos.iter_mut()) {
                    let offset = base_samples + mod_samples * lfo.next() * 0.5;
                    voice_sum += line.read(offset);
                    line.write(x);
                }
                let wet_sample = voice_sum / voices as f32;
                out[n] = knee_clip(wet_dry_mix(x, wet_sample, wet));

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
