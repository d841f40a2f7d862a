//! WAV file reading and writing.

use hound::{SampleFormat, WavReader, WavWriter};
use matiz_core::AudioBuffer;
use std::io::{Seek, Write};
use std::path::Path;

use crate::{Error, Result};

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// WAV file specification.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32).
    pub bits_per_sample: u16,
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

fn hound_spec(channels: u16, sample_rate: u32, bits_per_sample: u16) -> Result<hound::WavSpec> {
    let sample_format = match bits_per_sample {
        16 | 24 => SampleFormat::Int,
        32 => SampleFormat::Float,
        other => return Err(Error::UnsupportedBitDepth(other)),
    };
    Ok(hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample,
        sample_format,
    })
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = reader.len() as u64; // total across all channels
    let num_frames = total_samples / u64::from(spec.channels);
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// Read a WAV file into an [`AudioBuffer`], preserving all channels.
///
/// Integer PCM is normalized by `2^(bits-1)`; float samples pass through
/// untouched.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(AudioBuffer, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = spec.channels as usize;

    let interleaved: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    if interleaved.is_empty() || channels == 0 {
        return Err(Error::EmptyFile);
    }

    let frames = interleaved.len() / channels;
    let mut data: Vec<Vec<f32>> = (0..channels).map(|_| Vec::with_capacity(frames)).collect();
    for frame in interleaved.chunks_exact(channels) {
        for (ch, &sample) in frame.iter().enumerate() {
            data[ch].push(sample);
        }
    }

    tracing::debug!(
        channels,
        frames,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        "loaded WAV"
    );

    let buffer = AudioBuffer::new(spec.sample_rate, data)
        .map_err(|_| Error::EmptyFile)?;
    Ok((buffer, spec))
}

/// Write an [`AudioBuffer`] to a WAV file.
///
/// `bits_per_sample` selects the encoding: 16 or 24 for integer PCM, 32
/// for IEEE float. Samples are interleaved in channel order.
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    buffer: &AudioBuffer,
    bits_per_sample: u16,
) -> Result<()> {
    let spec = hound_spec(
        buffer.num_channels() as u16,
        buffer.sample_rate(),
        bits_per_sample,
    )?;
    let mut writer = WavWriter::create(path, spec)?;
    write_samples(&mut writer, buffer, bits_per_sample)?;
    writer.finalize()?;
    Ok(())
}

/// Encode a buffer into an in-memory WAV byte stream.
///
/// Useful for handing finished audio to another encoder, and for asserting
/// on the raw RIFF header in tests.
pub fn encode_wav(buffer: &AudioBuffer, bits_per_sample: u16) -> Result<Vec<u8>> {
    let spec = hound_spec(
        buffer.num_channels() as u16,
        buffer.sample_rate(),
        bits_per_sample,
    )?;
    let mut cursor = std::io::Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec)?;
    write_samples(&mut writer, buffer, bits_per_sample)?;
    writer.finalize()?;
    Ok(cursor.into_inner())
}

fn write_samples<W: Write + Seek>(
    writer: &mut WavWriter<W>,
    buffer: &AudioBuffer,
    bits_per_sample: u16,
) -> Result<()> {
    let channels: Vec<&[f32]> = buffer.channels().collect();
    if bits_per_sample == 32 {
        for n in 0..buffer.len() {
            for ch in &channels {
                writer.write_sample(ch[n])?;
            }
        }
    } else {
        let max_val = (1i64 << (bits_per_sample - 1)) as f32;
        for n in 0..buffer.len() {
            for ch in &channels {
                let scaled = (ch[n] * max_val).clamp(-max_val, max_val - 1.0);
                writer.write_sample(scaled as i32)?;
            }
        }
    }
    Ok(())
}
