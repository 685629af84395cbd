//! STFT phase vocoder
//!
//! Pitch shifting by `s` semitones in two steps:
//! 1. Time-stretch the signal by `2^(s/12)` in the STFT domain, keeping pitch
//! 2. Resample by `2^(-s/12)`, which restores the duration and moves the pitch
//!
//! The STFT uses a periodic Hann window with centred zero padding. The
//! inverse divides by the summed squared window so overlap-add is exact.

use super::resample::resample;
use super::{pitch_ratio, PitchShifter};
use crate::error::{EffectError, Result};
use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;

/// Shifts below this many semitones return the input unchanged
const IDENTITY_SEMITONES: f32 = 1e-6;

type Spectrogram = Vec<Vec<Complex64>>;

/// Phase-vocoder pitch shifter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseVocoder {
    n_fft: usize,
    hop_length: usize,
}

impl Default for PhaseVocoder {
    fn default() -> Self {
        Self {
            n_fft: Self::DEFAULT_N_FFT,
            hop_length: Self::DEFAULT_HOP_LENGTH,
        }
    }
}

impl PhaseVocoder {
    pub const DEFAULT_N_FFT: usize = 2048;
    pub const DEFAULT_HOP_LENGTH: usize = 512;

    /// Create a vocoder with a custom frame size
    ///
    /// `n_fft` must be a power of two of at least 4; `hop_length` must be in
    /// `1..=n_fft / 2`.
    pub fn new(n_fft: usize, hop_length: usize) -> Result<Self> {
        if n_fft < 4 || !n_fft.is_power_of_two() {
            return Err(EffectError::invalid_parameter(
                "n_fft",
                n_fft,
                "must be a power of two >= 4",
            ));
        }
        if hop_length == 0 || hop_length > n_fft / 2 {
            return Err(EffectError::invalid_parameter(
                "hop_length",
                hop_length,
                format!("must be in 1..={}", n_fft / 2),
            ));
        }
        Ok(Self { n_fft, hop_length })
    }

    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Stretch `samples` to `round(len * stretch)` frames without changing pitch
    pub fn time_stretch(&self, samples: &[f32], stretch: f64) -> Vec<f32> {
        let length = (samples.len() as f64 * stretch).round() as usize;
        if samples.is_empty() {
            return Vec::new();
        }

        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(self.n_fft);
        let inverse = planner.plan_fft_inverse(self.n_fft);
        let window = hann(self.n_fft);

        let signal: Vec<f64> = samples.iter().map(|&s| f64::from(s)).collect();
        let spectrogram = self.stft(&signal, &forward, &window);
        let stretched = self.vocode(&spectrogram, 1.0 / stretch);

        self.istft(&stretched, &inverse, &window, length)
            .into_iter()
            .map(|s| s as f32)
            .collect()
    }

    fn bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    fn stft(&self, signal: &[f64], fft: &Arc<dyn Fft<f64>>, window: &[f64]) -> Spectrogram {
        let pad = self.n_fft / 2;
        let mut padded = vec![0.0; pad];
        padded.extend_from_slice(signal);
        padded.resize(padded.len() + pad, 0.0);
        if padded.len() < self.n_fft {
            padded.resize(self.n_fft, 0.0);
        }

        let frames = 1 + (padded.len() - self.n_fft) / self.hop_length;
        let mut buffer = vec![Complex64::default(); self.n_fft];

        (0..frames)
            .map(|t| {
                let start = t * self.hop_length;
                for ((slot, &x), &w) in buffer
                    .iter_mut()
                    .zip(&padded[start..start + self.n_fft])
                    .zip(window)
                {
                    *slot = Complex64::new(x * w, 0.0);
                }
                fft.process(&mut buffer);
                buffer[..self.bins()].to_vec()
            })
            .collect()
    }

    /// Resample the spectrogram in time by `rate` frames per output frame
    ///
    /// Magnitudes are interpolated linearly between neighbouring frames;
    /// phases are accumulated from the measured per-bin phase advance.
    fn vocode(&self, spectrogram: &[Vec<Complex64>], rate: f64) -> Spectrogram {
        let bins = self.bins();
        let silent = vec![Complex64::default(); bins];
        let column = |i: usize| spectrogram.get(i).unwrap_or(&silent);

        let expected_advance: Vec<f64> = (0..bins)
            .map(|k| 2.0 * PI * self.hop_length as f64 * k as f64 / self.n_fft as f64)
            .collect();
        let mut phase: Vec<f64> = column(0).iter().map(|c| c.arg()).collect();

        let steps = (spectrogram.len() as f64 / rate).ceil() as usize;
        (0..steps)
            .map(|step| {
                let t = step as f64 * rate;
                let index = t.floor() as usize;
                let alpha = t - t.floor();
                let (current, next) = (column(index), column(index + 1));

                (0..bins)
                    .map(|k| {
                        let magnitude = (1.0 - alpha) * current[k].norm() + alpha * next[k].norm();
                        let out = Complex64::from_polar(magnitude, phase[k]);

                        let mut delta = next[k].arg() - current[k].arg() - expected_advance[k];
                        delta -= 2.0 * PI * (delta / (2.0 * PI)).round();
                        phase[k] += expected_advance[k] + delta;

                        out
                    })
                    .collect()
            })
            .collect()
    }

    fn istft(
        &self,
        spectrogram: &[Vec<Complex64>],
        ifft: &Arc<dyn Fft<f64>>,
        window: &[f64],
        length: usize,
    ) -> Vec<f64> {
        let bins = self.bins();
        let total = self.n_fft + self.hop_length * spectrogram.len().saturating_sub(1);
        let mut signal = vec![0.0; total];
        let mut window_sum = vec![0.0; total];
        let mut buffer = vec![Complex64::default(); self.n_fft];
        let scale = 1.0 / self.n_fft as f64;

        for (t, frame) in spectrogram.iter().enumerate() {
            // Rebuild the full Hermitian spectrum from the positive bins
            for (k, slot) in buffer.iter_mut().enumerate() {
                *slot = if k < bins {
                    frame[k]
                } else {
                    frame[self.n_fft - k].conj()
                };
            }
            buffer[0].im = 0.0;
            buffer[bins - 1].im = 0.0;
            ifft.process(&mut buffer);

            let start = t * self.hop_length;
            for (i, (&w, sample)) in window.iter().zip(&buffer).enumerate() {
                signal[start + i] += sample.re * scale * w;
                window_sum[start + i] += w * w;
            }
        }

        for (s, &norm) in signal.iter_mut().zip(&window_sum) {
            if norm > f64::MIN_POSITIVE {
                *s /= norm;
            }
        }

        let pad = self.n_fft / 2;
        let mut output: Vec<f64> = signal.into_iter().skip(pad).take(length).collect();
        output.resize(length, 0.0);
        output
    }
}

impl PitchShifter for PhaseVocoder {
    fn shift_channel(&self, samples: &[f32], _sample_rate: u32, semitones: f32) -> Result<Vec<f32>> {
        if semitones.abs() < IDENTITY_SEMITONES || samples.is_empty() {
            return Ok(samples.to_vec());
        }

        let stretch = pitch_ratio(semitones);
        let stretched = self.time_stretch(samples, stretch);
        let mut shifted = resample(&stretched, 1.0 / stretch)?;
        shifted.resize(samples.len(), 0.0);
        Ok(shifted)
    }

    fn name(&self) -> &'static str {
        "phase_vocoder"
    }
}

/// Periodic Hann window
fn hann(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / size as f64).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, sample_rate: f64, frames: usize) -> Vec<f32> {
        (0..frames)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate).sin() as f32)
            .collect()
    }

    #[test]
    fn hann_is_periodic() {
        let w = hann(8);
        assert_eq!(w[0], 0.0);
        assert!((w[4] - 1.0).abs() < 1e-12);
        assert!((w[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn unit_stretch_reconstructs_signal() {
        let vocoder = PhaseVocoder::default();
        let input = sine(440.0, 22_050.0, 8000);
        let output = vocoder.time_stretch(&input, 1.0);

        assert_eq!(output.len(), input.len());
        let max_err = input
            .iter()
            .zip(&output)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(max_err < 1e-4, "max error {max_err}");
    }

    #[test]
    fn stretch_sets_length() {
        let vocoder = PhaseVocoder::default();
        let input = sine(440.0, 22_050.0, 5000);
        assert_eq!(vocoder.time_stretch(&input, 1.5).len(), 7500);
        assert_eq!(vocoder.time_stretch(&input, 0.5).len(), 2500);
    }

    #[test]
    fn shift_preserves_length() {
        let vocoder = PhaseVocoder::default();
        let input = sine(330.0, 22_050.0, 6000);
        for semitones in [-12.0, -3.5, 4.0, 12.0] {
            let output = vocoder.shift_channel(&input, 22_050, semitones).unwrap();
            assert_eq!(output.len(), input.len(), "semitones {semitones}");
        }
    }

    #[test]
    fn shorter_than_one_frame() {
        let vocoder = PhaseVocoder::default();
        let input = sine(440.0, 22_050.0, 300);
        let output = vocoder.shift_channel(&input, 22_050, 5.0).unwrap();
        assert_eq!(output.len(), 300);
    }

    #[test]
    fn zero_shift_is_exact_copy() {
        let vocoder = PhaseVocoder::default();
        let input = sine(440.0, 22_050.0, 1000);
        assert_eq!(vocoder.shift_channel(&input, 22_050, 0.0).unwrap(), input);
    }

    #[test]
    fn rejects_bad_frame_sizes() {
        assert!(PhaseVocoder::new(1023, 256).is_err());
        assert!(PhaseVocoder::new(1024, 0).is_err());
        assert!(PhaseVocoder::new(1024, 600).is_err());
        assert_eq!(PhaseVocoder::new(1024, 256).unwrap().n_fft(), 1024);
    }
}
