//! Multi-channel audio sample storage.
//!
//! An [`AudioBuffer`] is what an effect render consumes and produces: one
//! `Vec<f32>` per channel at a fixed sample rate. Shape invariants (equal
//! channel lengths, nonzero sample rate) are checked at construction so the
//! effect pipelines can index freely inside the sample loop.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// A decoded, fully in-memory block of PCM audio.
///
/// Samples are normalized floating point, nominally in [-1, 1]. Channel
/// layout is planar (one contiguous slice per channel), which matches how
/// the per-channel effect loops walk the data.
///
/// # Example
///
/// ```rust
/// use matiz_core::AudioBuffer;
///
/// let buffer = AudioBuffer::new(48000, vec![vec![0.0; 128], vec![0.0; 128]]).unwrap();
/// assert_eq!(buffer.num_channels(), 2);
/// assert_eq!(buffer.len(), 128);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

/// Why an [`AudioBuffer`] could not be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferShapeError {
    /// Sample rate was zero.
    ZeroSampleRate,
    /// No channels were supplied.
    NoChannels,
    /// Channel lengths differ.
    UnequalChannelLengths {
        /// Length of channel 0.
        expected: usize,
        /// Index of the first offending channel.
        channel: usize,
        /// Its length.
        actual: usize,
    },
}

impl core::fmt::Display for BufferShapeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroSampleRate => write!(f, "sample rate must be nonzero"),
            Self::NoChannels => write!(f, "buffer must have at least one channel"),
            Self::UnequalChannelLengths {
                expected,
                channel,
                actual,
            } => write!(
                f,
                "channel {channel} has {actual} samples, expected {expected}"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BufferShapeError {}

impl AudioBuffer {
    /// Create a buffer from per-channel sample data.
    ///
    /// # Errors
    ///
    /// Returns [`BufferShapeError`] if the sample rate is zero, no channels
    /// are supplied, or the channels have differing lengths.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, BufferShapeError> {
        if sample_rate == 0 {
            return Err(BufferShapeError::ZeroSampleRate);
        }
        if channels.is_empty() {
            return Err(BufferShapeError::NoChannels);
        }
        let expected = channels[0].len();
        for (i, ch) in channels.iter().enumerate().skip(1) {
            if ch.len() != expected {
                return Err(BufferShapeError::UnequalChannelLengths {
                    expected,
                    channel: i,
                    actual: ch.len(),
                });
            }
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Create a silent buffer with the given shape.
    pub fn silent(sample_rate: u32, num_channels: usize, len: usize) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            channels: vec![vec![0.0; len]; num_channels.max(1)],
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    /// Whether the buffer holds zero samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 / f64::from(self.sample_rate)
    }

    /// One channel's samples.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// Mutable access to one channel's samples.
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    /// Iterate over channels.
    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        self.channels.iter().map(Vec::as_slice)
    }

    /// Consume the buffer, returning its channel data.
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Peak absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|ch| ch.iter())
            .fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    /// Root-mean-square level across all channels.
    pub fn rms(&self) -> f32 {
        let total: usize = self.channels.iter().map(Vec::len).sum();
        if total == 0 {
            return 0.0;
        }
        let sum: f32 = self
            .channels
            .iter()
            .flat_map(|ch| ch.iter())
            .map(|s| s * s)
            .sum();
        libm::sqrtf(sum / total as f32)
    }
}
