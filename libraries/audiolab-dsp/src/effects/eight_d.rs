//! 8D auto-pan
//!
//! The signal is folded to mono and swept between the ears with a slow
//! sinusoidal pan curve. Gains follow an equal-power law so loudness stays
//! constant across the sweep, then a crossfeed blends the channels back
//! toward each other.

use crate::error::Result;
use crate::normalize::peak_normalize;
use crate::params::{EIGHT_D_CROSSFEED, EIGHT_D_INTENSITY, EIGHT_D_PAN_SPEED_HZ};
use audiolab_core::SignalBuffer;
use std::f64::consts::PI;

/// 8D settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EightDParams {
    /// Full left-right-left cycles per second (0.05 to 1.0)
    pub pan_speed_hz: f32,

    /// Sweep depth, 1.0 reaches hard left/right (0.1 to 1.0)
    pub intensity: f32,

    /// Fraction of the opposite channel blended in (0.0 to 0.6)
    pub crossfeed: f32,
}

impl Default for EightDParams {
    fn default() -> Self {
        Self {
            pan_speed_hz: 0.15,
            intensity: 0.8,
            crossfeed: 0.3,
        }
    }
}

impl EightDParams {
    pub fn validate(&self) -> Result<()> {
        EIGHT_D_PAN_SPEED_HZ.check_f32(self.pan_speed_hz)?;
        EIGHT_D_INTENSITY.check_f32(self.intensity)?;
        EIGHT_D_CROSSFEED.check_f32(self.crossfeed)
    }

    /// Pan position at time `t` seconds: 0.0 hard left, 1.0 hard right
    pub fn pan_position(&self, t: f64) -> f64 {
        let raw = 0.5 + 0.5 * (2.0 * PI * f64::from(self.pan_speed_hz) * t).sin();
        0.5 + f64::from(self.intensity) * (raw - 0.5)
    }
}

/// Sweep the signal around the listener
///
/// Output is always stereo with the input's length, and peak-normalized.
///
/// The crossfeed runs in two sequential steps: the left channel is blended
/// first, and the right channel is then blended with the already-updated
/// left, so the blend is asymmetric.
pub fn eight_d(buffer: &SignalBuffer, params: &EightDParams) -> Result<SignalBuffer> {
    params.validate()?;

    let stereo = buffer.to_stereo();
    let channels = stereo.channels();
    let sr = f64::from(buffer.sample_rate().as_hz());
    let crossfeed = f64::from(params.crossfeed);

    let frames = buffer.frames();
    let mut out_left = Vec::with_capacity(frames);
    let mut out_right = Vec::with_capacity(frames);

    for (n, (&l, &r)) in channels[0].iter().zip(&channels[1]).enumerate() {
        let pan = params.pan_position(n as f64 / sr);
        let mono = (f64::from(l) + f64::from(r)) * 0.5;

        let left = mono * (1.0 - pan).sqrt();
        let right = mono * pan.sqrt();

        let left = left * (1.0 - crossfeed) + right * crossfeed;
        let right = right * (1.0 - crossfeed) + left * crossfeed;

        out_left.push(left as f32);
        out_right.push(right as f32);
    }

    let panned = SignalBuffer::stereo(out_left, out_right, buffer.sample_rate())?;
    Ok(peak_normalize(&panned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use audiolab_core::SampleRate;

    #[test]
    fn pan_starts_centred() {
        let params = EightDParams::default();
        assert!((params.pan_position(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn pan_reaches_extremes_at_full_intensity() {
        let params = EightDParams {
            pan_speed_hz: 1.0,
            intensity: 1.0,
            crossfeed: 0.0,
        };
        assert!((params.pan_position(0.25) - 1.0).abs() < 1e-9);
        assert!(params.pan_position(0.75).abs() < 1e-9);
    }

    #[test]
    fn intensity_limits_excursion() {
        let params = EightDParams {
            pan_speed_hz: 1.0,
            intensity: 0.2,
            crossfeed: 0.0,
        };
        let pos = params.pan_position(0.25);
        assert!((pos - 0.6).abs() < 1e-6);
    }

    #[test]
    fn keeps_length_and_goes_stereo() {
        let input = SignalBuffer::mono(vec![0.3; 500], SampleRate::new(1000)).unwrap();
        let output = eight_d(&input, &EightDParams::default()).unwrap();
        assert!(output.is_stereo());
        assert_eq!(output.frames(), 500);
        assert!((output.peak() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn equal_power_without_crossfeed() {
        let params = EightDParams {
            pan_speed_hz: 0.5,
            intensity: 1.0,
            crossfeed: 0.0,
        };
        let input = SignalBuffer::mono(vec![0.5; 1000], SampleRate::new(1000)).unwrap();
        let output = eight_d(&input, &params).unwrap();
        let (l, r) = (output.channel(0).unwrap(), output.channel(1).unwrap());
        let power0 = l[0] * l[0] + r[0] * r[0];
        for i in (0..1000).step_by(97) {
            let power = l[i] * l[i] + r[i] * r[i];
            assert!((power - power0).abs() < 1e-4, "frame {i}: {power} vs {power0}");
        }
    }
}
