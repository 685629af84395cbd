//! Signal buffer types

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// 44.1 kHz
    pub const CD_QUALITY: Self = Self(44_100);
    /// 48 kHz
    pub const DVD_QUALITY: Self = Self(48_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }

    /// Half the sample rate, the highest representable frequency
    pub fn nyquist(&self) -> f64 {
        f64::from(self.0) / 2.0
    }

    /// Number of samples spanning `ms` milliseconds, rounded to nearest
    pub fn samples_for_ms(&self, ms: f64) -> usize {
        (f64::from(self.0) * ms / 1000.0).round().max(0.0) as usize
    }

    /// Sample index closest to `seconds`
    pub fn samples_for_secs(&self, seconds: f64) -> usize {
        (seconds * f64::from(self.0)).round().max(0.0) as usize
    }
}

/// Maximum number of channels a buffer may carry
pub const MAX_CHANNELS: usize = 2;

/// Planar PCM buffer with one or two equal-length channels
///
/// Samples are f32 with a nominal range of [-1.0, 1.0]; nothing clamps them
/// until an effect peak-normalizes its output. Every effect consumes a buffer
/// by reference and returns a fresh one.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: SampleRate,
}

impl SignalBuffer {
    /// Create a mono buffer
    pub fn mono(samples: Vec<f32>, sample_rate: SampleRate) -> Result<Self> {
        Self::from_channels(vec![samples], sample_rate)
    }

    /// Create a stereo buffer from separate left/right channels
    pub fn stereo(left: Vec<f32>, right: Vec<f32>, sample_rate: SampleRate) -> Result<Self> {
        Self::from_channels(vec![left, right], sample_rate)
    }

    /// Create a buffer from planar channels
    ///
    /// # Errors
    /// Fails on zero or more than two channels, on unequal channel lengths,
    /// and on a zero sample rate.
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: SampleRate) -> Result<Self> {
        if sample_rate.as_hz() == 0 {
            return Err(CoreError::InvalidSampleRate(0));
        }
        if channels.is_empty() || channels.len() > MAX_CHANNELS {
            return Err(CoreError::invalid_buffer(format!(
                "expected 1 or 2 channels, got {}",
                channels.len()
            )));
        }
        let len = channels[0].len();
        if channels.iter().any(|c| c.len() != len) {
            return Err(CoreError::invalid_buffer(format!(
                "channel lengths differ: {:?}",
                channels.iter().map(Vec::len).collect::<Vec<_>>()
            )));
        }

        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Create a buffer from interleaved samples (L, R, L, R, ...)
    pub fn from_interleaved(
        samples: &[f32],
        channel_count: usize,
        sample_rate: SampleRate,
    ) -> Result<Self> {
        if channel_count == 0 || channel_count > MAX_CHANNELS {
            return Err(CoreError::invalid_buffer(format!(
                "expected 1 or 2 channels, got {}",
                channel_count
            )));
        }
        if samples.len() % channel_count != 0 {
            return Err(CoreError::invalid_buffer(format!(
                "{} interleaved samples is not a multiple of {} channels",
                samples.len(),
                channel_count
            )));
        }

        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Self::from_channels(channels, sample_rate)
    }

    /// Planar channel data
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Samples of a single channel
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Consume the buffer and return its channels
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Number of channels (1 or 2)
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// One channel
    pub fn is_mono(&self) -> bool {
        self.channels.len() == 1
    }

    /// Two channels
    pub fn is_stereo(&self) -> bool {
        self.channels.len() == 2
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    /// Check if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Sample rate of every channel
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Get the duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate.as_hz())
    }

    /// Maximum absolute sample value across all channels
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .map(|s| s.abs())
            .fold(0.0f32, f32::max)
    }

    /// Interleave channels into a single vector (L, R, L, R, ...)
    pub fn interleaved(&self) -> Vec<f32> {
        let frames = self.frames();
        let mut out = Vec::with_capacity(frames * self.channel_count());
        for i in 0..frames {
            for channel in &self.channels {
                out.push(channel[i]);
            }
        }
        out
    }

    /// Build a new buffer by transforming every channel independently
    ///
    /// The closure must return the same length for every channel.
    pub fn map_channels<F>(&self, mut f: F) -> Result<Self>
    where
        F: FnMut(&[f32]) -> Vec<f32>,
    {
        let channels = self.channels.iter().map(|c| f(c)).collect();
        Self::from_channels(channels, self.sample_rate)
    }

    /// Apply `f` to every sample, keeping the layout
    pub fn map_samples<F>(&self, f: F) -> Self
    where
        F: Fn(f32) -> f32,
    {
        Self {
            channels: self
                .channels
                .iter()
                .map(|c| c.iter().map(|&s| f(s)).collect())
                .collect(),
            sample_rate: self.sample_rate,
        }
    }

    /// Stereo view of the buffer: mono is duplicated onto both channels
    pub fn to_stereo(&self) -> Self {
        let channels = if self.is_mono() {
            vec![self.channels[0].clone(), self.channels[0].clone()]
        } else {
            self.channels.clone()
        };
        Self {
            channels,
            sample_rate: self.sample_rate,
        }
    }
}

/// Summary of a decoded buffer, as reported after an upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioInfo {
    /// Duration in seconds, rounded to two decimals
    pub duration_seconds: f64,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// 1 for mono, 2 for stereo
    pub channels: usize,
    /// Samples per channel
    pub frames: usize,
}

impl From<&SignalBuffer> for AudioInfo {
    fn from(buffer: &SignalBuffer) -> Self {
        Self {
            duration_seconds: (buffer.duration_secs() * 100.0).round() / 100.0,
            sample_rate: buffer.sample_rate().as_hz(),
            channels: buffer.channel_count(),
            frames: buffer.frames(),
        }
    }
}
