//! Audio Lab Core
//!
//! Platform-agnostic building blocks shared by the DSP, codec and CLI crates.
//!
//! The core crate defines:
//! - **Signal types**: `SignalBuffer` (mono or stereo planar PCM) and `SampleRate`
//! - **Collaborator traits**: `AudioDecoder`, `AudioEncoder`
//! - **Error handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use audiolab_core::{SampleRate, SignalBuffer};
//!
//! let buffer = SignalBuffer::mono(vec![0.0, 0.5, -0.5], SampleRate::new(44_100)).unwrap();
//! assert_eq!(buffer.frames(), 3);
//! assert!(buffer.is_mono());
//!
//! let stereo = buffer.to_stereo();
//! assert_eq!(stereo.channel_count(), 2);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod buffer;
pub mod error;
pub mod traits;

pub use buffer::{AudioInfo, SampleRate, SignalBuffer};
pub use error::{CoreError, Result};
pub use traits::{AudioDecoder, AudioEncoder};
