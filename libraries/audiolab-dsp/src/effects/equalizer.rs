//! 7-band equalizer
//!
//! Each band is a peaking biquad (RBJ cookbook) with a fixed Q. Bands with
//! no meaningful gain, or centred at/above Nyquist, are omitted; the rest are
//! cascaded per channel.

use crate::error::Result;
use crate::normalize::peak_normalize;
use crate::params::EQ_BAND_FIELDS;
use audiolab_core::{SampleRate, SignalBuffer};
use std::f64::consts::PI;

/// Fixed quality factor shared by every band
pub const EQ_Q: f64 = 1.4;

/// Gains below this magnitude (dB) bypass the band
const FLAT_THRESHOLD_DB: f32 = 0.01;

/// Equalizer band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqBand {
    SubBass,
    Bass,
    LowMid,
    Mid,
    HighMid,
    Presence,
    Brilliance,
}

impl EqBand {
    /// All bands, low to high
    pub const ALL: [Self; 7] = [
        Self::SubBass,
        Self::Bass,
        Self::LowMid,
        Self::Mid,
        Self::HighMid,
        Self::Presence,
        Self::Brilliance,
    ];

    /// Parameter name of the band's gain
    pub fn name(&self) -> &'static str {
        EQ_BAND_FIELDS[self.index()].name
    }

    /// Center frequency in Hz
    pub fn center_hz(&self) -> f64 {
        match self {
            Self::SubBass => 60.0,
            Self::Bass => 170.0,
            Self::LowMid => 500.0,
            Self::Mid => 1000.0,
            Self::HighMid => 3000.0,
            Self::Presence => 6000.0,
            Self::Brilliance => 12000.0,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Equalizer preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EqPreset {
    /// All bands at 0 dB
    #[default]
    Flat,

    /// Enhanced low frequencies
    BassBoost,

    /// Enhanced high frequencies
    TrebleBoost,

    /// Boosted lows and highs, reduced mids
    VShape,

    /// Enhanced mid frequencies for voice
    Vocal,
}

impl EqPreset {
    pub const ALL: [Self; 5] = [
        Self::Flat,
        Self::BassBoost,
        Self::TrebleBoost,
        Self::VShape,
        Self::Vocal,
    ];

    /// Band gains in dB, in `EqBand::ALL` order
    pub fn gains(&self) -> [f32; 7] {
        match self {
            Self::Flat => [0.0; 7],
            Self::BassBoost => [6.0, 5.0, 2.0, 0.0, 0.0, 0.0, 0.0],
            Self::TrebleBoost => [0.0, 0.0, 0.0, 0.0, 2.0, 4.0, 6.0],
            Self::VShape => [5.0, 3.0, -1.0, -2.0, -1.0, 3.0, 5.0],
            Self::Vocal => [-2.0, -1.0, 1.0, 3.0, 4.0, 2.0, -1.0],
        }
    }

    /// Identifier accepted in the `preset` request key
    pub fn id(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::BassBoost => "bass_boost",
            Self::TrebleBoost => "treble_boost",
            Self::VShape => "v_shape",
            Self::Vocal => "vocal",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Flat => "Flat",
            Self::BassBoost => "Bass Boost",
            Self::TrebleBoost => "Treble Boost",
            Self::VShape => "V-Shape",
            Self::Vocal => "Vocal",
        }
    }
}

/// Per-band gains in dB (-12 to +12)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EqualizerParams {
    pub gains: [f32; 7],
}

impl EqualizerParams {
    pub fn from_preset(preset: EqPreset) -> Self {
        Self {
            gains: preset.gains(),
        }
    }

    /// Builder-style single band setter
    #[must_use]
    pub fn with_gain(mut self, band: EqBand, gain_db: f32) -> Self {
        self.gains[band.index()] = gain_db;
        self
    }

    pub fn gain_db(&self, band: EqBand) -> f32 {
        self.gains[band.index()]
    }

    pub fn validate(&self) -> Result<()> {
        for (gain, spec) in self.gains.iter().zip(EQ_BAND_FIELDS.iter()) {
            spec.check_f32(*gain)?;
        }
        Ok(())
    }
}

/// Normalized second-order section (a0 = 1)
///
/// Runs in transposed direct form II with f64 state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadSection {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadSection {
    /// Filter a whole channel from zero initial state
    pub fn process(&self, input: &[f64]) -> Vec<f64> {
        let mut z1 = 0.0;
        let mut z2 = 0.0;
        input
            .iter()
            .map(|&x| {
                let y = self.b0 * x + z1;
                z1 = self.b1 * x - self.a1 * y + z2;
                z2 = self.b2 * x - self.a2 * y;
                y
            })
            .collect()
    }

    /// Magnitude response at `freq` Hz
    pub fn magnitude_at(&self, freq: f64, sample_rate: SampleRate) -> f64 {
        let w = 2.0 * PI * freq / f64::from(sample_rate.as_hz());
        let (c1, s1) = (w.cos(), w.sin());
        let (c2, s2) = ((2.0 * w).cos(), (2.0 * w).sin());

        let num_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let num_im = -(self.b1 * s1 + self.b2 * s2);
        let den_re = 1.0 + self.a1 * c1 + self.a2 * c2;
        let den_im = -(self.a1 * s1 + self.a2 * s2);

        num_re.hypot(num_im) / den_re.hypot(den_im)
    }
}

/// Design a peaking EQ section
///
/// ```text
/// A     = 10^(gain_db/40)
/// w0    = 2π·freq/sr
/// alpha = sin(w0) / (2·Q)
/// ```
pub fn design_peaking(freq: f64, gain_db: f64, q: f64, sample_rate: SampleRate) -> BiquadSection {
    let a = 10.0_f64.powf(gain_db / 40.0);
    let w0 = 2.0 * PI * freq / f64::from(sample_rate.as_hz());
    let alpha = w0.sin() / (2.0 * q);
    let cos_w0 = w0.cos();

    let a0 = 1.0 + alpha / a;
    BiquadSection {
        b0: (1.0 + alpha * a) / a0,
        b1: (-2.0 * cos_w0) / a0,
        b2: (1.0 - alpha * a) / a0,
        a1: (-2.0 * cos_w0) / a0,
        a2: (1.0 - alpha / a) / a0,
    }
}

/// Sections for every band that is not flat and sits below Nyquist
pub fn active_sections(params: &EqualizerParams, sample_rate: SampleRate) -> Vec<BiquadSection> {
    let nyquist = sample_rate.nyquist();
    EqBand::ALL
        .iter()
        .zip(params.gains.iter())
        .filter(|(band, gain)| gain.abs() >= FLAT_THRESHOLD_DB && band.center_hz() < nyquist)
        .map(|(band, &gain)| design_peaking(band.center_hz(), f64::from(gain), EQ_Q, sample_rate))
        .collect()
}

/// Apply the equalizer
///
/// With no active band the input is returned unchanged; otherwise the
/// filtered result is peak-normalized.
pub fn equalize(buffer: &SignalBuffer, params: &EqualizerParams) -> Result<SignalBuffer> {
    params.validate()?;

    let sections = active_sections(params, buffer.sample_rate());
    if sections.is_empty() {
        return Ok(buffer.clone());
    }

    let filtered = buffer.map_channels(|channel| {
        let mut signal: Vec<f64> = channel.iter().map(|&s| f64::from(s)).collect();
        for section in &sections {
            signal = section.process(&signal);
        }
        signal.into_iter().map(|s| s as f32).collect()
    })?;

    Ok(peak_normalize(&filtered))
}
