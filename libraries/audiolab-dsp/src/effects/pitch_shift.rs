//! Duration-preserving pitch shift

use crate::error::Result;
use crate::normalize::peak_normalize;
use crate::params::PITCH_SEMITONES;
use crate::pitch::PitchShifter;
use audiolab_core::SignalBuffer;

/// Shifts smaller than this are treated as no shift at all
const IDENTITY_SEMITONES: f32 = 1e-6;

/// Pitch shift settings
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PitchShiftParams {
    /// Shift in semitones (-12 to +12)
    pub semitones: f32,
}

impl PitchShiftParams {
    pub fn validate(&self) -> Result<()> {
        PITCH_SEMITONES.check_f32(self.semitones)
    }
}

/// Shift every channel by `params.semitones` through `shifter`
///
/// Channel count and per-channel length are preserved exactly: whatever the
/// backend returns is truncated or zero-padded to the input length. A zero
/// shift returns an exact copy.
pub fn pitch_shift(
    buffer: &SignalBuffer,
    params: &PitchShiftParams,
    shifter: &dyn PitchShifter,
) -> Result<SignalBuffer> {
    params.validate()?;

    if params.semitones.abs() < IDENTITY_SEMITONES || buffer.is_empty() {
        return Ok(buffer.clone());
    }

    let sample_rate = buffer.sample_rate();
    let frames = buffer.frames();
    let channels = buffer
        .channels()
        .iter()
        .map(|channel| {
            let mut shifted = shifter.shift_channel(channel, sample_rate.as_hz(), params.semitones)?;
            shifted.resize(frames, 0.0);
            Ok(shifted)
        })
        .collect::<Result<Vec<_>>>()?;

    let shifted = SignalBuffer::from_channels(channels, sample_rate)?;
    Ok(peak_normalize(&shifted))
}
