//! Cut a time range out of a signal

use crate::error::{EffectError, Result};
use crate::params::{TRIM_END_TIME, TRIM_START_TIME};
use audiolab_core::SignalBuffer;

/// Trim range in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimParams {
    pub start_time: f64,
    /// `None` keeps everything up to the end of the signal
    pub end_time: Option<f64>,
}

impl Default for TrimParams {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            end_time: None,
        }
    }
}

impl TrimParams {
    pub fn validate(&self) -> Result<()> {
        TRIM_START_TIME.check(self.start_time)?;
        if let Some(end) = self.end_time {
            TRIM_END_TIME.check(end)?;
        }
        Ok(())
    }

    /// End time, defaulting to the full duration of `buffer`
    pub fn end_for(&self, buffer: &SignalBuffer) -> f64 {
        self.end_time.unwrap_or_else(|| buffer.duration_secs())
    }
}

/// Keep samples `[round(start * sr), round(end * sr))` of every channel
///
/// # Errors
///
/// - `EmptySignal` if the input has no samples
/// - `InvalidRange` if either bound is not finite, `start < 0`,
///   `end > duration` or `start >= end`
pub fn trim(buffer: &SignalBuffer, start_time: f64, end_time: f64) -> Result<SignalBuffer> {
    if buffer.is_empty() {
        return Err(EffectError::EmptySignal);
    }

    let duration = buffer.duration_secs();
    let invalid = |reason| EffectError::InvalidRange {
        start: start_time,
        end: end_time,
        duration,
        reason,
    };
    if !(start_time.is_finite() && end_time.is_finite()) {
        return Err(invalid("bounds must be finite"));
    }
    if start_time < 0.0 {
        return Err(invalid("start time is negative"));
    }
    if end_time > duration {
        return Err(invalid("end time exceeds duration"));
    }
    if start_time >= end_time {
        return Err(invalid("start time must be before end time"));
    }

    let sample_rate = buffer.sample_rate();
    let frames = buffer.frames();
    let end = sample_rate.samples_for_secs(end_time).min(frames);
    let start = sample_rate.samples_for_secs(start_time).min(end);

    Ok(buffer.map_channels(|channel| channel[start..end].to_vec())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use audiolab_core::SampleRate;

    fn ramp(frames: usize, sr: u32) -> SignalBuffer {
        SignalBuffer::mono((0..frames).map(|i| i as f32).collect(), SampleRate::new(sr)).unwrap()
    }

    #[test]
    fn slices_rounded_range() {
        let input = ramp(1000, 100);
        let output = trim(&input, 1.0, 2.5).unwrap();
        assert_eq!(output.frames(), 150);
        assert_eq!(output.channel(0).unwrap()[0], 100.0);
        assert_eq!(output.channel(0).unwrap()[149], 249.0);
    }

    #[test]
    fn full_range_is_identity() {
        let input = ramp(480, 48);
        let output = trim(&input, 0.0, input.duration_secs()).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn stereo_channels_cut_identically() {
        let input = SignalBuffer::stereo(
            (0..100).map(|i| i as f32).collect(),
            (0..100).map(|i| -(i as f32)).collect(),
            SampleRate::new(10),
        )
        .unwrap();
        let output = trim(&input, 2.0, 3.0).unwrap();
        assert_eq!(output.channel(0).unwrap(), &[20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0, 27.0, 28.0, 29.0]);
        assert_eq!(output.channel(1).unwrap()[0], -20.0);
    }

    #[test]
    fn rejects_bad_ranges() {
        let input = ramp(1000, 100);
        for (start, end) in [(5.0, 5.0), (6.0, 5.0), (0.0, 10.5), (-1.0, 2.0)] {
            let err = trim(&input, start, end).unwrap_err();
            assert!(matches!(err, EffectError::InvalidRange { .. }), "{start}..{end}: {err}");
        }
    }

    #[test]
    fn rejects_non_finite_bounds() {
        let input = ramp(1000, 100);
        for (start, end) in [
            (0.0, f64::NAN),
            (f64::NAN, 0.5),
            (f64::NEG_INFINITY, 2.0),
            (0.0, f64::INFINITY),
        ] {
            let err = trim(&input, start, end).unwrap_err();
            assert!(matches!(err, EffectError::InvalidRange { .. }), "{start}..{end}: {err}");
        }
    }

    #[test]
    fn empty_checked_before_range() {
        let input = SignalBuffer::mono(Vec::new(), SampleRate::new(100)).unwrap();
        assert!(matches!(trim(&input, 5.0, 1.0), Err(EffectError::EmptySignal)));
    }

    #[test]
    fn end_defaults_to_duration() {
        let input = ramp(250, 100);
        assert_eq!(TrimParams::default().end_for(&input), 2.5);
        assert_eq!(
            TrimParams {
                start_time: 0.0,
                end_time: Some(1.0)
            }
            .end_for(&input),
            1.0
        );
    }
}
