//! Test signal generation
//!
//! All generators return `SignalBuffer`s so they feed effects directly.

use audiolab_core::{SampleRate, SignalBuffer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

fn sine_samples(frequency: f64, sample_rate: u32, duration: f64, amplitude: f32) -> Vec<f32> {
    let frames = (f64::from(sample_rate) * duration).round() as usize;
    (0..frames)
        .map(|i| {
            let t = i as f64 / f64::from(sample_rate);
            (2.0 * PI * frequency * t).sin() as f32 * amplitude
        })
        .collect()
}

/// Mono sine wave
///
/// # Panics
/// Panics if `sample_rate` is zero.
pub fn sine(frequency: f64, sample_rate: u32, duration: f64, amplitude: f32) -> SignalBuffer {
    SignalBuffer::mono(
        sine_samples(frequency, sample_rate, duration, amplitude),
        SampleRate::new(sample_rate),
    )
    .expect("valid mono buffer")
}

/// Stereo buffer with an independent tone on each channel
pub fn stereo_sine(
    left_frequency: f64,
    right_frequency: f64,
    sample_rate: u32,
    duration: f64,
    amplitude: f32,
) -> SignalBuffer {
    SignalBuffer::stereo(
        sine_samples(left_frequency, sample_rate, duration, amplitude),
        sine_samples(right_frequency, sample_rate, duration, amplitude),
        SampleRate::new(sample_rate),
    )
    .expect("valid stereo buffer")
}

/// Digital silence
pub fn silence(frames: usize, channels: usize, sample_rate: u32) -> SignalBuffer {
    SignalBuffer::from_channels(vec![vec![0.0; frames]; channels], SampleRate::new(sample_rate))
        .expect("valid silent buffer")
}

/// Unit impulse at frame `position`
pub fn impulse(frames: usize, position: usize, sample_rate: u32) -> SignalBuffer {
    let mut samples = vec![0.0; frames];
    if let Some(s) = samples.get_mut(position) {
        *s = 1.0;
    }
    SignalBuffer::mono(samples, SampleRate::new(sample_rate)).expect("valid impulse buffer")
}

/// Seeded white noise, uniform in [-amplitude, amplitude]
pub fn noise(frames: usize, sample_rate: u32, amplitude: f32, seed: u64) -> SignalBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let samples = (0..frames)
        .map(|_| rng.gen_range(-amplitude..=amplitude))
        .collect();
    SignalBuffer::mono(samples, SampleRate::new(sample_rate)).expect("valid noise buffer")
}
