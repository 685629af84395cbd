//! Peak normalization
//!
//! Final stage of every effect: scales the whole buffer so its loudest
//! sample sits exactly at the target ceiling.

use audiolab_core::SignalBuffer;

/// Default ceiling, leaves ~0.45 dB of headroom below full scale
pub const DEFAULT_TARGET_PEAK: f32 = 0.95;

/// Scale `buffer` so that its maximum absolute sample equals `target_peak`
///
/// A silent buffer is returned unchanged.
pub fn normalize(buffer: &SignalBuffer, target_peak: f32) -> SignalBuffer {
    let peak = buffer.peak();
    if peak == 0.0 {
        return buffer.clone();
    }

    let scale = f64::from(target_peak) / f64::from(peak);
    buffer.map_samples(|s| (f64::from(s) * scale) as f32)
}

/// Normalize to `DEFAULT_TARGET_PEAK`
pub fn peak_normalize(buffer: &SignalBuffer) -> SignalBuffer {
    normalize(buffer, DEFAULT_TARGET_PEAK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use audiolab_core::SampleRate;

    #[test]
    fn normalizes_to_target() {
        let buffer = SignalBuffer::mono(vec![0.25, -0.5, 0.1], SampleRate::new(22_050)).unwrap();
        let out = normalize(&buffer, 1.0);
        assert!((out.peak() - 1.0).abs() < 1e-6);
        // Relative shape preserved
        assert!((out.channel(0).unwrap()[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn default_target_is_095() {
        let buffer = SignalBuffer::mono(vec![2.0, -4.0], SampleRate::new(22_050)).unwrap();
        let out = peak_normalize(&buffer);
        assert!((out.peak() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn silent_signal_unchanged() {
        let buffer = SignalBuffer::mono(vec![0.0; 100], SampleRate::new(22_050)).unwrap();
        let out = peak_normalize(&buffer);
        assert_eq!(out, buffer);
    }

    #[test]
    fn stereo_uses_global_peak() {
        let buffer =
            SignalBuffer::stereo(vec![0.1, 0.2], vec![0.4, -0.8], SampleRate::new(22_050)).unwrap();
        let out = normalize(&buffer, 0.8);
        assert!((out.channel(1).unwrap()[1] + 0.8).abs() < 1e-6);
        assert!((out.channel(0).unwrap()[1] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn empty_buffer_unchanged() {
        let buffer = SignalBuffer::mono(Vec::new(), SampleRate::new(22_050)).unwrap();
        assert!(peak_normalize(&buffer).is_empty());
    }
}
