//! Matiz Core - DSP primitives for offline audio effect rendering.
//!
//! This crate provides the filter and modulation building blocks that the
//! effect pipelines in `matiz-effects` assemble into per-channel sample
//! loops. Everything here is a small state machine: one
//! `process(sample) -> sample` transition per call, with internal memory
//! (delay buffers, prior outputs) owned exclusively by the instance.
//!
//! # Primitives
//!
//! - [`DelayLine`] - circular buffer with fractional, linearly interpolated reads
//! - [`CombFilter`] - feedback comb with one-pole damping (reverb building block)
//! - [`AllpassFilter`] - Schroeder allpass for diffusion
//! - [`Biquad`] - second-order IIR with RBJ cookbook coefficients
//! - [`OnePole`] - one-pole lowpass for tone controls
//! - [`EnvelopeFollower`] - amplitude tracking with attack/release smoothing
//! - [`Lfo`] - sine phase accumulator for delay/frequency modulation
//!
//! # Buffers
//!
//! - [`AudioBuffer`] - multi-channel sample storage consumed and produced by
//!   effect renders
//!
//! # Utilities
//!
//! - Level conversions: [`db_to_linear`], [`linear_to_db`]
//! - Clipping: [`soft_clip`] (tanh), [`knee_clip`] (exponential knee)
//! - [`flush_denormal`], [`wet_dry_mix`], [`lerp`], [`ms_to_samples`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (with `alloc`). Disable the default
//! `std` feature:
//!
//! ```toml
//! [dependencies]
//! matiz-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Fresh state per render**: primitives are cheap to construct and are
//!   built anew for every processing call; none of them cache anything
//!   across calls.
//! - **No validation inside primitives**: callers (the effect pipelines)
//!   validate parameters before the sample loop; primitives assume sane
//!   inputs and never branch on error paths.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod biquad;
pub mod buffer;
pub mod comb;
pub mod delay;
pub mod envelope;
pub mod lfo;
pub mod math;
pub mod one_pole;

pub use allpass::AllpassFilter;
pub use biquad::{
    Biquad, BiquadCoeffs, bandpass_coefficients, lowpass_coefficients, notch_coefficients,
    peaking_eq_coefficients,
};
pub use buffer::{AudioBuffer, BufferShapeError};
pub use comb::CombFilter;
pub use delay::DelayLine;
pub use envelope::EnvelopeFollower;
pub use lfo::Lfo;
pub use math::{
    db_to_linear, flush_denormal, knee_clip, lerp, linear_to_db, ms_to_samples, soft_clip,
    wet_dry_mix,
};
pub use one_pole::OnePole;
