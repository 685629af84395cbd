//! Audio Lab codec collaborators
//!
//! Bytes in, bytes out around the DSP core:
//! - `SymphoniaDecoder`: any supported container → `SignalBuffer`
//! - `WavEncoder`: `SignalBuffer` → WAV (16-bit PCM or 32-bit float)
//! - `validation`: upload extension allow-list and size limit
//!
//! # Example
//!
//! ```rust
//! use audiolab_codec::{SymphoniaDecoder, WavEncoder};
//! use audiolab_core::{AudioDecoder, AudioEncoder, SampleRate, SignalBuffer};
//!
//! let buffer = SignalBuffer::mono(vec![0.0, 0.5, -0.5, 0.25], SampleRate::new(8000)).unwrap();
//! let wav = WavEncoder::default().encode(&buffer).unwrap();
//!
//! let decoded = SymphoniaDecoder::new().decode(&wav, Some("wav")).unwrap();
//! assert_eq!(decoded.frames(), 4);
//! assert_eq!(decoded.sample_rate(), SampleRate::new(8000));
//! ```

#![forbid(unsafe_code)]

mod decoder;
mod encoder;
pub mod validation;

pub use decoder::SymphoniaDecoder;
pub use encoder::{WavEncoder, WavSampleFormat};

use audiolab_core::{AudioInfo, SignalBuffer};

/// Summary of a decoded buffer
pub fn audio_info(buffer: &SignalBuffer) -> AudioInfo {
    AudioInfo::from(buffer)
}
