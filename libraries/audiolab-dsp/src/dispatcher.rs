//! Effect dispatcher
//!
//! Routes a request (effect name + raw JSON parameters) to its effect
//! function. The dispatcher validates parameters before any DSP runs,
//! applies the final normalization, and is the only place that logs.

use crate::effects::{eight_d, equalize, pitch_shift, reverb, reverse, stereo_widen, trim};
use crate::error::{EffectError, Result};
use crate::normalize::{normalize, DEFAULT_TARGET_PEAK};
use crate::params::{catalogue, EffectDescriptor, EffectParams, EffectRequest};
use crate::pitch::{PhaseVocoder, PitchShifter};
use audiolab_core::SignalBuffer;
use serde_json::Value;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, info_span};

/// Stateless effect router
///
/// Holds only configuration, so a single instance can be shared across
/// threads and invoked concurrently.
pub struct Dispatcher {
    target_peak: f32,
    pitch_shifter: Box<dyn PitchShifter>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("target_peak", &self.target_peak)
            .field("pitch_shifter", &self.pitch_shifter.name())
            .finish()
    }
}

impl Dispatcher {
    /// Dispatcher with the bundled phase vocoder and a 0.95 output ceiling
    pub fn new() -> Self {
        Self {
            target_peak: DEFAULT_TARGET_PEAK,
            pitch_shifter: Box::new(PhaseVocoder::default()),
        }
    }

    /// Set the final normalization ceiling, in (0, 1]
    pub fn with_target_peak(mut self, target_peak: f32) -> Result<Self> {
        if !(target_peak > 0.0 && target_peak <= 1.0) {
            return Err(EffectError::invalid_parameter(
                "target_peak",
                target_peak,
                "must be in (0, 1]",
            ));
        }
        self.target_peak = target_peak;
        Ok(self)
    }

    /// Replace the pitch-shift backend
    #[must_use]
    pub fn with_pitch_shifter(mut self, shifter: Box<dyn PitchShifter>) -> Self {
        self.pitch_shifter = shifter;
        self
    }

    pub fn target_peak(&self) -> f32 {
        self.target_peak
    }

    pub fn pitch_shifter_name(&self) -> &'static str {
        self.pitch_shifter.name()
    }

    /// Schema of every effect
    pub fn describe(&self) -> Vec<&'static EffectDescriptor> {
        catalogue()
    }

    /// Validate a raw request and run it
    ///
    /// # Errors
    ///
    /// - `UnknownEffect` for an identifier outside the catalogue
    /// - `InvalidParameter` for a missing-bound, malformed or non-object parameter set
    /// - whatever the effect itself reports (`InvalidRange`, `EmptySignal`, ...)
    pub fn apply(&self, buffer: &SignalBuffer, effect: &str, params: &Value) -> Result<SignalBuffer> {
        let request = EffectRequest::parse(effect, params)?;
        if !request.ignored_keys.is_empty() {
            debug!(
                effect,
                ignored = ?request.ignored_keys,
                "Ignoring unrecognised parameters"
            );
        }
        self.run(buffer, &request.params)
    }

    /// Run an already-parsed parameter set
    pub fn run(&self, buffer: &SignalBuffer, params: &EffectParams) -> Result<SignalBuffer> {
        let kind = params.kind();
        let span = info_span!(
            "effect",
            effect = %kind,
            frames = buffer.frames(),
            channels = buffer.channel_count(),
            sample_rate = buffer.sample_rate().as_hz()
        );
        let _guard = span.enter();

        params.validate()?;
        debug!(?params, "Parameters validated");

        let started = Instant::now();
        let output = match params {
            EffectParams::Reverse => reverse(buffer)?,
            EffectParams::Trim(p) => trim(buffer, p.start_time, p.end_for(buffer))?,
            EffectParams::PitchShift(p) => pitch_shift(buffer, p, self.pitch_shifter.as_ref())?,
            EffectParams::Reverb(p) => reverb(buffer, p)?,
            EffectParams::StereoWiden(p) => stereo_widen(buffer, p)?,
            EffectParams::EightDAudio(p) => eight_d(buffer, p)?,
            EffectParams::Equalizer(p) => equalize(buffer, p)?,
        };
        let output = normalize(&output, self.target_peak);

        info!(
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            output_frames = output.frames(),
            output_channels = output.channel_count(),
            "Effect applied"
        );

        Ok(output)
    }
}
