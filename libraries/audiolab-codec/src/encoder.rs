//! WAV encoder using hound

use audiolab_core::{AudioEncoder, CoreError, Result, SignalBuffer};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Sample encoding of the written WAV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavSampleFormat {
    /// 16-bit signed integer PCM, samples clamped to [-1, 1]
    #[default]
    Int16,
    /// 32-bit IEEE float, written as-is
    Float32,
}

impl WavSampleFormat {
    fn spec(self, channels: u16, sample_rate: u32) -> WavSpec {
        let (bits_per_sample, sample_format) = match self {
            Self::Int16 => (16, SampleFormat::Int),
            Self::Float32 => (32, SampleFormat::Float),
        };
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample,
            sample_format,
        }
    }
}

/// Encodes a `SignalBuffer` to an in-memory WAV file
#[derive(Debug, Default, Clone, Copy)]
pub struct WavEncoder {
    format: WavSampleFormat,
}

impl WavEncoder {
    pub fn new(format: WavSampleFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> WavSampleFormat {
        self.format
    }
}

impl AudioEncoder for WavEncoder {
    fn encode(&mut self, buffer: &SignalBuffer) -> Result<Vec<u8>> {
        let channels = u16::try_from(buffer.channel_count())
            .map_err(|_| CoreError::encode("too many channels for WAV"))?;
        let spec = self.format.spec(channels, buffer.sample_rate().as_hz());

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec)
                .map_err(|e| CoreError::encode(format!("Failed to start WAV: {}", e)))?;

            for sample in buffer.interleaved() {
                let written = match self.format {
                    WavSampleFormat::Int16 => writer.write_sample(to_i16(sample)),
                    WavSampleFormat::Float32 => writer.write_sample(sample),
                };
                written.map_err(|e| CoreError::encode(format!("Failed to write sample: {}", e)))?;
            }

            writer
                .finalize()
                .map_err(|e| CoreError::encode(format!("Failed to finalize WAV: {}", e)))?;
        }

        Ok(cursor.into_inner())
    }

    fn extension(&self) -> &'static str {
        "wav"
    }
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use audiolab_core::SampleRate;

    #[test]
    fn int16_conversion_clamps() {
        assert_eq!(to_i16(0.0), 0);
        assert_eq!(to_i16(1.0), i16::MAX);
        assert_eq!(to_i16(1.5), i16::MAX);
        assert_eq!(to_i16(-2.0), -i16::MAX);
        assert_eq!(to_i16(0.5), 16384);
    }

    #[test]
    fn writes_riff_header() {
        let buffer = SignalBuffer::stereo(vec![0.1; 10], vec![-0.1; 10], SampleRate::new(8000)).unwrap();
        let bytes = WavEncoder::default().encode(&buffer).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        // 44-byte header + 10 frames * 2 channels * 2 bytes
        assert_eq!(bytes.len(), 44 + 40);
    }

    #[test]
    fn float_output_is_larger() {
        let buffer = SignalBuffer::mono(vec![0.25; 100], SampleRate::new(8000)).unwrap();
        let pcm = WavEncoder::default().encode(&buffer).unwrap();
        let float = WavEncoder::new(WavSampleFormat::Float32).encode(&buffer).unwrap();
        assert!(float.len() > pcm.len());
    }
}
