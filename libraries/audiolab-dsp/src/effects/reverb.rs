//! Multi-tap echo reverb

use crate::error::Result;
use crate::normalize::peak_normalize;
use crate::params::{REVERB_DECAY, REVERB_DELAY_MS};
use audiolab_core::SignalBuffer;

/// Number of echo reflections appended after the dry signal
pub const REFLECTIONS: usize = 5;

/// Reverb settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    /// Gain ratio between successive reflections (0.1 to 0.9)
    pub decay: f32,

    /// Spacing between reflections in milliseconds (50 to 300)
    pub delay_ms: u32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            decay: 0.5,
            delay_ms: 100,
        }
    }
}

impl ReverbParams {
    pub fn validate(&self) -> Result<()> {
        REVERB_DECAY.check_f32(self.decay)?;
        REVERB_DELAY_MS.check(f64::from(self.delay_ms))
    }
}

/// Add `REFLECTIONS` decaying copies of the signal, `delay_ms` apart
///
/// Output length is `N + REFLECTIONS * round(sr * delay_ms / 1000)`. Reflection
/// `i` is scaled by `decay^i`. The result is peak-normalized.
pub fn reverb(buffer: &SignalBuffer, params: &ReverbParams) -> Result<SignalBuffer> {
    params.validate()?;

    let delay = buffer
        .sample_rate()
        .samples_for_ms(f64::from(params.delay_ms));
    let decay = f64::from(params.decay);

    let wet = buffer.map_channels(|channel| echo_taps(channel, delay, decay))?;
    Ok(peak_normalize(&wet))
}

fn echo_taps(input: &[f32], delay: usize, decay: f64) -> Vec<f32> {
    let len = input.len();
    let out_len = len + delay * REFLECTIONS;
    let mut output = vec![0.0f32; out_len];
    output[..len].copy_from_slice(input);

    let mut gain = 1.0;
    for i in 1..=REFLECTIONS {
        gain *= decay;
        let offset = delay * i;
        let span = len.min(out_len - offset);
        for (out, &dry) in output[offset..offset + span].iter_mut().zip(&input[..span]) {
            *out = (f64::from(*out) + f64::from(dry) * gain) as f32;
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use audiolab_core::SampleRate;

    #[test]
    fn impulse_produces_decaying_taps() {
        let mut impulse = vec![0.0; 10];
        impulse[0] = 1.0;
        let taps = echo_taps(&impulse, 10, 0.5);

        assert_eq!(taps.len(), 60);
        assert_eq!(taps[0], 1.0);
        assert_eq!(taps[10], 0.5);
        assert_eq!(taps[20], 0.25);
        assert!((taps[50] - 0.03125).abs() < 1e-7);
        assert_eq!(taps[5], 0.0);
    }

    #[test]
    fn output_length_uses_rounded_delay() {
        // 22_050 * 0.075 = 1653.75 -> 1654
        let input = SignalBuffer::mono(vec![0.5; 100], SampleRate::new(22_050)).unwrap();
        let output = reverb(
            &input,
            &ReverbParams {
                decay: 0.3,
                delay_ms: 75,
            },
        )
        .unwrap();
        assert_eq!(output.frames(), 100 + 5 * 1654);
    }

    #[test]
    fn output_is_normalized() {
        let input = SignalBuffer::stereo(vec![0.1; 50], vec![0.2; 50], SampleRate::new(1000)).unwrap();
        let output = reverb(&input, &ReverbParams::default()).unwrap();
        assert!(output.is_stereo());
        assert!((output.peak() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn rejects_out_of_bounds_decay() {
        let input = SignalBuffer::mono(vec![0.1; 10], SampleRate::new(1000)).unwrap();
        let err = reverb(
            &input,
            &ReverbParams {
                decay: 0.95,
                delay_ms: 100,
            },
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("decay"));
    }
}
