//! Stereo widening
//!
//! Widens the image with three cues applied in sequence:
//! - a short delay on the right channel (Haas effect)
//! - a fixed level drop on the delayed channel
//! - mid/side processing with the side component boosted
//!
//! Mid = (L + R) / 2, Side = (L - R) / 2 * `SIDE_BOOST`, then
//! L = Mid + Side, R = Mid - Side.

use crate::error::Result;
use crate::normalize::peak_normalize;
use crate::params::{WIDEN_DELAY_MS, WIDEN_GAIN_DIFF_DB};
use audiolab_core::SignalBuffer;

/// Fixed gain applied to the side signal
pub const SIDE_BOOST: f64 = 1.3;

/// Stereo widen settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereoWidenParams {
    /// Right channel delay in milliseconds (5 to 20)
    pub delay_ms: u32,

    /// Level drop of the delayed channel in dB (0 to 6)
    pub gain_diff_db: f32,
}

impl Default for StereoWidenParams {
    fn default() -> Self {
        Self {
            delay_ms: 10,
            gain_diff_db: 1.5,
        }
    }
}

impl StereoWidenParams {
    pub fn validate(&self) -> Result<()> {
        WIDEN_DELAY_MS.check(f64::from(self.delay_ms))?;
        WIDEN_GAIN_DIFF_DB.check_f32(self.gain_diff_db)
    }

    /// Linear gain applied to the delayed channel
    pub fn gain_factor(&self) -> f64 {
        10.0_f64.powf(-f64::from(self.gain_diff_db) / 20.0)
    }
}

/// Widen the stereo image
///
/// Mono input is duplicated onto both channels first. The output is always
/// stereo, `round(sr * delay_ms / 1000)` frames longer than the input, and
/// peak-normalized.
pub fn stereo_widen(buffer: &SignalBuffer, params: &StereoWidenParams) -> Result<SignalBuffer> {
    params.validate()?;

    let stereo = buffer.to_stereo();
    let channels = stereo.channels();
    let (left, right) = (&channels[0], &channels[1]);

    let delay = buffer
        .sample_rate()
        .samples_for_ms(f64::from(params.delay_ms));
    let gain = params.gain_factor();
    let out_len = left.len() + delay;

    let mut out_left = Vec::with_capacity(out_len);
    let mut out_right = Vec::with_capacity(out_len);

    for i in 0..out_len {
        // Left padded at the end, right delayed at the start
        let l = left.get(i).map_or(0.0, |&s| f64::from(s));
        let r = i
            .checked_sub(delay)
            .and_then(|j| right.get(j))
            .map_or(0.0, |&s| f64::from(s) * gain);

        let mid = (l + r) * 0.5;
        let side = (l - r) * 0.5 * SIDE_BOOST;

        out_left.push((mid + side) as f32);
        out_right.push((mid - side) as f32);
    }

    let widened = SignalBuffer::stereo(out_left, out_right, buffer.sample_rate())?;
    Ok(peak_normalize(&widened))
}
