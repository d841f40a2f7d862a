//! WAV file I/O for matiz.
//!
//! Decodes WAV files into [`matiz_core::AudioBuffer`] values (all channels
//! preserved, samples normalized to [-1, 1]) and encodes buffers back to
//! 16/24-bit integer or 32-bit float PCM.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use matiz_io::{read_wav, write_wav};
//!
//! let (buffer, spec) = read_wav("input.wav")?;
//! // ... process ...
//! write_wav("output.wav", &buffer, 16)?;
//! ```

mod wav;

pub use wav::{WavFormat, WavInfo, WavSpec, encode_wav, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported encoding request.
    #[error("unsupported bit depth {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// The decoded file held no audio.
    #[error("WAV file contains no samples")]
    EmptyFile,
}

/// Convenience result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
