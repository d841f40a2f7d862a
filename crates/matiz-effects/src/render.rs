//! The rendering contract shared by every effect.
//!
//! An effect is a parameter struct implementing [`Render`]: validate the
//! parameters, then transform a whole [`AudioBuffer`] into a new one in a
//! single synchronous pass. Progress is reported cooperatively through
//! [`Progress`] at coarse chunk boundaries so an embedding UI can stay
//! responsive without the core modeling any asynchrony.

use matiz_core::AudioBuffer;

use crate::error::EffectError;

/// Samples processed between progress checkpoints.
pub const PROGRESS_CHUNK: usize = 4096;

/// Forwards render progress to an optional caller-supplied callback.
///
/// The callback receives `(percent_complete, status_text)`. Calls are
/// throttled to whole-percent changes, so a multi-minute render produces at
/// most 101 callbacks regardless of buffer length.
pub struct Progress<'a> {
    callback: Option<&'a mut dyn FnMut(f32, &str)>,
    total: u64,
    done: u64,
    last_whole: i64,
}

impl<'a> Progress<'a> {
    /// Wrap a callback.
    pub fn new(callback: &'a mut dyn FnMut(f32, &str)) -> Self {
        Self {
            callback: Some(callback),
            total: 1,
            done: 0,
            last_whole: -1,
        }
    }

    /// A progress reporter that discards everything.
    pub fn sink() -> Progress<'static> {
        Progress {
            callback: None,
            total: 1,
            done: 0,
            last_whole: -1,
        }
    }

    /// Reset for a render covering `total` units of work.
    pub fn begin(&mut self, total: u64) {
        self.total = total.max(1);
        self.done = 0;
        self.last_whole = -1;
    }

    /// Record `units` of completed work, forwarding on whole-percent change.
    pub fn step(&mut self, units: u64, status: &str) {
        self.done = (self.done + units).min(self.total);
        let Some(callback) = self.callback.as_mut() else {
            return;
        };
        let percent = self.done as f32 / self.total as f32 * 100.0;
        let whole = percent as i64;
        if whole != self.last_whole {
            self.last_whole = whole;
            callback(percent, status);
        }
    }
}

/// A configured effect that can render an input buffer to an output buffer.
///
/// Implementations are plain parameter structs; all filter state is built
/// fresh inside [`render`](Render::render) (one instance per channel) and
/// discarded before it returns, so a single value can render any number of
/// buffers with identical results.
pub trait Render {
    /// Short lowercase effect name, used in errors and progress text.
    fn name(&self) -> &'static str;

    /// Output length in samples for the given input.
    ///
    /// Every effect preserves length except the reverb, which appends its
    /// tail.
    fn output_len(&self, input: &AudioBuffer) -> usize {
        input.len()
    }

    /// Check all parameters; called by `render` before any processing.
    fn validate(&self) -> Result<(), EffectError>;

    /// Render `input` into a freshly allocated output buffer.
    fn render(
        &self,
        input: &AudioBuffer,
        progress: &mut Progress<'_>,
    ) -> Result<AudioBuffer, EffectError>;

    /// Render without progress reporting.
    fn apply(&self, input: &AudioBuffer) -> Result<AudioBuffer, EffectError> {
        self.render(input, &mut Progress::sink())
    }
}

/// Shared entry guard: parameters valid, buffer non-empty, channels aligned.
pub(crate) fn check_render_input(
    effect: &impl Render,
    input: &AudioBuffer,
) -> Result<(), EffectError> {
    effect.validate()?;
    if input.num_channels() == 0 || input.is_empty() {
        return Err(EffectError::EmptyBuffer);
    }
    let expected = input.len();
    for (index, channel) in input.channels().enumerate() {
        if channel.len() != expected {
            return Err(EffectError::InconsistentChannels {
                index,
                expected,
                actual: channel.len(),
            });
        }
    }
    tracing::debug!(
        effect = effect.name(),
        channels = input.num_channels(),
        samples = input.len(),
        sample_rate = input.sample_rate(),
        "rendering"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_throttles_to_whole_percents() {
        let mut calls = Vec::new();
        let mut cb = |pct: f32, _status: &str| calls.push(pct);
        let mut progress = Progress::new(&mut cb);
        progress.begin(100_000);
        for _ in 0..100_000 {
            progress.step(1, "working");
        }
        assert!(calls.len() <= 101);
        assert!((calls.last().copied().unwrap() - 100.0).abs() < 1e-3);
        assert!(calls.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_progress_clamps_overshoot() {
        let mut last = 0.0;
        let mut cb = |pct: f32, _: &str| last = pct;
        let mut progress = Progress::new(&mut cb);
        progress.begin(10);
        progress.step(50, "done");
        assert!((last - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_sink_is_silent() {
        let mut progress = Progress::sink();
        progress.begin(10);
        progress.step(10, "ignored");
    }
}
