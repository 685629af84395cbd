//! Audio Lab DSP
//!
//! Offline, whole-buffer audio effects for Audio Lab.
//!
//! This crate provides:
//! - A peak normalizer used as the final stage of every effect
//! - Seven pure effects: reverse, trim, reverb, stereo widen, 8D auto-pan,
//!   7-band equalizer and duration-preserving pitch shift
//! - A parameter schema with bound checks and documented defaults
//! - A dispatcher that validates a request and routes it to its effect
//!
//! Every effect takes a `SignalBuffer` by reference and returns a new one,
//! so independent invocations can run on any number of threads.
//!
//! # Example: Direct effect call
//!
//! ```rust
//! use audiolab_core::{SampleRate, SignalBuffer};
//! use audiolab_dsp::effects::{reverb, ReverbParams};
//!
//! let input = SignalBuffer::mono(vec![1.0, 0.0, 0.0, 0.0], SampleRate::new(1000)).unwrap();
//! let params = ReverbParams { decay: 0.5, delay_ms: 50 };
//! let output = reverb(&input, &params).unwrap();
//!
//! // 5 reflections, 50 samples apart
//! assert_eq!(output.frames(), 4 + 5 * 50);
//! ```
//!
//! # Example: Dispatching a raw request
//!
//! ```rust
//! use audiolab_core::{SampleRate, SignalBuffer};
//! use audiolab_dsp::Dispatcher;
//! use serde_json::json;
//!
//! let input = SignalBuffer::mono(vec![0.1, 0.2, 0.3], SampleRate::CD_QUALITY).unwrap();
//! let dispatcher = Dispatcher::new();
//! let output = dispatcher.apply(&input, "reverse", &json!({})).unwrap();
//!
//! assert_eq!(output.frames(), 3);
//! ```

#![forbid(unsafe_code)]

pub mod dispatcher;
pub mod effects;
mod error;
pub mod normalize;
pub mod params;
pub mod pitch;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use dispatcher::Dispatcher;
pub use error::{EffectError, Result};
pub use normalize::{normalize, peak_normalize, DEFAULT_TARGET_PEAK};
pub use params::{EffectKind, EffectParams, EffectRequest};
pub use pitch::{PhaseVocoder, PitchShifter};
