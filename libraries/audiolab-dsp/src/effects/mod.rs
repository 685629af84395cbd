//! Offline audio effects
//!
//! Each effect is a pure function: it reads a `SignalBuffer` and returns a
//! freshly allocated one. Effects that reshape the level (reverb, widening,
//! 8D, EQ, pitch shift) peak-normalize their own output.
//!
//! Available effects:
//! - **reverse**: play the signal backward
//! - **trim**: cut a time range out of the signal
//! - **reverb**: five-tap decaying echo
//! - **stereo_widen**: inter-channel delay, gain offset and side boost
//! - **eight_d**: sinusoidal equal-power auto-pan with crossfeed
//! - **equalize**: 7-band cascade of peaking biquads
//! - **pitch_shift**: duration-preserving pitch shift through a pluggable backend

mod eight_d;
mod equalizer;
mod pitch_shift;
mod reverb;
mod reverse;
mod stereo_widen;
mod trim;

pub use eight_d::{eight_d, EightDParams};
pub use equalizer::{
    active_sections, design_peaking, equalize, BiquadSection, EqBand, EqPreset, EqualizerParams,
    EQ_Q,
};
pub use pitch_shift::{pitch_shift, PitchShiftParams};
pub use reverb::{reverb, ReverbParams, REFLECTIONS};
pub use reverse::reverse;
pub use stereo_widen::{stereo_widen, StereoWidenParams, SIDE_BOOST};
pub use trim::{trim, TrimParams};
