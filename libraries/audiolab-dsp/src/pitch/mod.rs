//! Pitch-shift backends
//!
//! Duration-preserving pitch shifting is a substantial transform of its own,
//! so it sits behind the `PitchShifter` trait. The bundled backend is an STFT
//! phase vocoder followed by a sinc resampler; any other implementation can be
//! handed to the dispatcher instead.

mod phase_vocoder;
mod resample;

pub use phase_vocoder::PhaseVocoder;
pub use resample::resample;

use crate::error::Result;

/// Shifts the pitch of a single channel without changing its duration
///
/// Implementations must be stateless between calls so one instance can serve
/// concurrent requests.
pub trait PitchShifter: Send + Sync {
    /// Shift `samples` by `semitones`
    ///
    /// The returned length should be close to `samples.len()`; the caller
    /// truncates or zero-pads it to the exact input length.
    fn shift_channel(&self, samples: &[f32], sample_rate: u32, semitones: f32)
        -> Result<Vec<f32>>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Frequency multiplier for a shift of `semitones`
pub fn pitch_ratio(semitones: f32) -> f64 {
    2.0_f64.powf(f64::from(semitones) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octave_doubles_frequency() {
        assert!((pitch_ratio(12.0) - 2.0).abs() < 1e-12);
        assert!((pitch_ratio(-12.0) - 0.5).abs() < 1e-12);
        assert_eq!(pitch_ratio(0.0), 1.0);
    }

    #[test]
    fn semitone_ratio() {
        assert!((pitch_ratio(1.0) - 1.059463).abs() < 1e-6);
    }
}
