//! Matiz Effects - offline audio effect pipelines.
//!
//! Each effect is a plain parameter struct implementing [`Render`]: it
//! validates its parameters, then transforms an input [`AudioBuffer`] into
//! a freshly allocated output buffer in one synchronous pass, channel by
//! channel, with independent filter state per channel. Progress is reported
//! through a caller-supplied callback at coarse chunk boundaries.
//!
//! # Effects
//!
//! | Effect | Topology |
//! |--------|----------|
//! | [`Reverb`] | 8 parallel combs + 4 series allpasses, tail extension |
//! | [`Chorus`] | N modulated delay voices, averaged |
//! | [`Flanger`] | One modulated delay with feedback per channel |
//! | [`Distortion`] | Waveshaper + tone filter, five transfer curves |
//! | [`Equalizer`] | Ten series peaking biquads, 0 dB bands skipped |
//! | [`LowPass`] | Cascaded biquads, selectable slope, resonant |
//! | [`Notch`] | Depth-blended notch biquad |
//! | [`Wah`] | Swept bandpass, envelope- or LFO-driven |
//! | [`Compressor`] | dB-domain gain computer with soft knee |
//! | [`Expander`] | Downward expansion + output normalization |
//! | [`Phaser`] | Swept first-order allpass chain with feedback |
//!
//! # Example
//!
//! ```rust
//! use matiz_core::AudioBuffer;
//! use matiz_effects::{Render, Reverb};
//!
//! let input = AudioBuffer::new(44100, vec![vec![0.0; 44100]]).unwrap();
//! let reverb = Reverb { decay_time: 1.0, ..Reverb::default() };
//! let output = reverb.apply(&input).unwrap();
//! assert_eq!(output.len(), input.len() + 44100);
//! ```

pub mod chorus;
pub mod compressor;
pub mod distortion;
pub mod equalizer;
pub mod error;
pub mod filter;
pub mod flanger;
pub mod phaser;
pub mod render;
pub mod reverb;
pub mod wah;

pub use chorus::Chorus;
pub use compressor::{Compressor, Expander};
pub use distortion::{Distortion, DistortionMode};
pub use equalizer::{BAND_FREQUENCIES, Equalizer};
pub use error::EffectError;
pub use filter::{LowPass, Notch};
pub use flanger::Flanger;
pub use matiz_core::AudioBuffer;
pub use phaser::Phaser;
pub use render::{PROGRESS_CHUNK, Progress, Render};
pub use reverb::Reverb;
pub use wah::{Wah, WahMode};
