//! Fixed-ratio sinc resampling of a whole channel

use crate::error::{EffectError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Input frames per resampler call
const CHUNK_SIZE: usize = 1024;

fn sinc_params() -> SincInterpolationParameters {
    SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Cubic,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris,
    }
}

/// Resample `input` by `ratio` (output rate / input rate)
///
/// Returns exactly `round(input.len() * ratio)` frames, with output frame 0
/// lined up with input frame 0. `SincFixedIn` already emits its first chunk
/// aligned, so nothing is dropped from the front.
pub fn resample(input: &[f32], ratio: f64) -> Result<Vec<f32>> {
    if !(ratio.is_finite() && ratio > 0.0) {
        return Err(EffectError::PitchBackend(format!(
            "invalid resample ratio {}",
            ratio
        )));
    }

    let expected = (input.len() as f64 * ratio).round() as usize;
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, sinc_params(), CHUNK_SIZE, 1)
        .map_err(|e| EffectError::PitchBackend(format!("SincFixedIn creation failed: {}", e)))?;

    let mut output = Vec::with_capacity(expected + CHUNK_SIZE);
    let mut position = 0;

    // Only full chunks are fed; the tail is zero-padded until the filter
    // tail of the last input frame has been flushed.
    while output.len() < expected {
        let frames_next = resampler.input_frames_next();
        let mut chunk = vec![0.0f32; frames_next];
        if position < input.len() {
            let end = (position + frames_next).min(input.len());
            chunk[..end - position].copy_from_slice(&input[position..end]);
        }
        position += frames_next;

        let input_channels = vec![chunk];
        let processed = resampler
            .process(&input_channels, None)
            .map_err(|e| EffectError::PitchBackend(format!("resampling failed: {}", e)))?;
        match processed.into_iter().next() {
            Some(channel) if !channel.is_empty() => output.extend(channel),
            _ => {
                return Err(EffectError::PitchBackend(
                    "resampler produced no output".to_string(),
                ))
            }
        }
    }

    output.truncate(expected);
    Ok(output)
}
