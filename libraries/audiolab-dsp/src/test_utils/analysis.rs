//! Analysis helpers for verifying effect output

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;
use std::f64::consts::PI;

/// Absolute maximum sample value
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// Root mean square level
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum / samples.len() as f64).sqrt() as f32
}

/// Largest absolute difference between two equal-length signals
///
/// Extra samples in the longer signal are ignored.
pub fn max_abs_diff(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0f32, f32::max)
}

/// Frequency of the strongest FFT bin, refined by parabolic interpolation
///
/// A Hann window is applied first to limit leakage.
pub fn dominant_frequency(samples: &[f32], sample_rate: u32) -> f64 {
    let n = samples.len();
    if n < 4 {
        return 0.0;
    }

    let mut buffer: Vec<Complex64> = samples
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let w = 0.5 - 0.5 * (2.0 * PI * i as f64 / n as f64).cos();
            Complex64::new(f64::from(s) * w, 0.0)
        })
        .collect();
    FftPlanner::<f64>::new().plan_fft_forward(n).process(&mut buffer);

    let magnitudes: Vec<f64> = buffer[..n / 2].iter().map(|c| c.norm()).collect();
    let Some((k, _)) = magnitudes
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
    else {
        return 0.0;
    };

    let offset = if k + 1 < magnitudes.len() {
        let (a, b, c) = (magnitudes[k - 1], magnitudes[k], magnitudes[k + 1]);
        let denom = a - 2.0 * b + c;
        if denom.abs() > f64::EPSILON {
            0.5 * (a - c) / denom
        } else {
            0.0
        }
    } else {
        0.0
    };

    (k as f64 + offset) * f64::from(sample_rate) / n as f64
}

/// Amplitude of the component at `frequency` (single-bin DFT)
pub fn magnitude_at(samples: &[f32], frequency: f64, sample_rate: u32) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let step = 2.0 * PI * frequency / f64::from(sample_rate);
    let (re, im) = samples
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(re, im), (i, &s)| {
            let phase = step * i as f64;
            (re + f64::from(s) * phase.cos(), im - f64::from(s) * phase.sin())
        });
    2.0 * re.hypot(im) / samples.len() as f64
}
