//! Error types for effect rendering.

use thiserror::Error;

/// Errors surfaced by effect validation and rendering.
///
/// Any error aborts the whole render; no partially processed buffer is ever
/// returned.
#[derive(Debug, Error)]
pub enum EffectError {
    /// A parameter was non-finite or outside its documented range.
    #[error("{effect}: parameter `{param}` is {value} (expected {expected})")]
    InvalidParameter {
        /// Effect name.
        effect: &'static str,
        /// Parameter name.
        param: &'static str,
        /// The offending value.
        value: f32,
        /// Human-readable description of the accepted range.
        expected: String,
    },

    /// The input buffer held no samples or no channels.
    #[error("input buffer is empty")]
    EmptyBuffer,

    /// Channel lengths diverged. `AudioBuffer` construction rejects this,
    /// so hitting it means the buffer was assembled by other means.
    #[error("channel {index} has {actual} samples, expected {expected}")]
    InconsistentChannels {
        /// Index of the mismatched channel.
        index: usize,
        /// Length of channel 0.
        expected: usize,
        /// Length of the mismatched channel.
        actual: usize,
    },
}

/// Validate that a parameter is finite and inside `[min, max]`.
pub(crate) fn check_param(
    effect: &'static str,
    param: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), EffectError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(EffectError::InvalidParameter {
            effect,
            param,
            value,
            expected: format!("{min}..={max}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_param_accepts_bounds() {
        assert!(check_param("reverb", "wet_dry", 0.0, 0.0, 100.0).is_ok());
        assert!(check_param("reverb", "wet_dry", 100.0, 0.0, 100.0).is_ok());
    }

    #[test]
    fn test_check_param_rejects_out_of_range() {
        let err = check_param("reverb", "wet_dry", 101.0, 0.0, 100.0).unwrap_err();
        assert!(err.to_string().contains("wet_dry"));
        assert!(err.to_string().contains("0..=100"));
    }

    #[test]
    fn test_check_param_rejects_non_finite() {
        assert!(check_param("chorus", "rate", f32::NAN, 0.0, 10.0).is_err());
        assert!(check_param("chorus", "rate", f32::INFINITY, 0.0, 10.0).is_err());
    }
}
