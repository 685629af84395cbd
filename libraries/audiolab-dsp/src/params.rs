//! Effect catalogue and parameter schema
//!
//! Every effect has a static descriptor listing its fields with bounds,
//! defaults and UI step sizes. Raw JSON parameters are read through these
//! field specs, turned into the typed per-effect structs, and validated
//! before any DSP runs.

use crate::effects::{
    EightDParams, EqPreset, EqualizerParams, PitchShiftParams, ReverbParams, StereoWidenParams,
    TrimParams,
};
use crate::error::{EffectError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The fixed catalogue of effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Reverse,
    Trim,
    PitchShift,
    Reverb,
    StereoWiden,
    EightDAudio,
    Equalizer,
}

impl EffectKind {
    /// All effects, in catalogue order
    pub const ALL: [Self; 7] = [
        Self::Reverse,
        Self::PitchShift,
        Self::Reverb,
        Self::StereoWiden,
        Self::Trim,
        Self::EightDAudio,
        Self::Equalizer,
    ];

    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reverse => "reverse",
            Self::Trim => "trim",
            Self::PitchShift => "pitch_shift",
            Self::Reverb => "reverb",
            Self::StereoWiden => "stereo_widen",
            Self::EightDAudio => "eight_d_audio",
            Self::Equalizer => "equalizer",
        }
    }

    /// Schema entry for this effect
    pub fn descriptor(&self) -> &'static EffectDescriptor {
        match self {
            Self::Reverse => &REVERSE_DESCRIPTOR,
            Self::Trim => &TRIM_DESCRIPTOR,
            Self::PitchShift => &PITCH_SHIFT_DESCRIPTOR,
            Self::Reverb => &REVERB_DESCRIPTOR,
            Self::StereoWiden => &STEREO_WIDEN_DESCRIPTOR,
            Self::EightDAudio => &EIGHT_D_DESCRIPTOR,
            Self::Equalizer => &EQUALIZER_DESCRIPTOR,
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKind {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EffectError::UnknownEffect(s.to_string()))
    }
}

/// Bounds, default and step of a single scalar parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    /// `true` when `min` itself is rejected
    pub min_exclusive: bool,
    /// `None` when the upper bound depends on the signal (trim end)
    pub max: Option<f64>,
    /// `None` when the default depends on the signal (trim end)
    pub default: Option<f64>,
    pub step: f64,
    /// Only whole numbers accepted
    pub integer: bool,
}

impl FieldSpec {
    /// Check a value against this field's bounds
    pub fn check(&self, value: f64) -> Result<()> {
        self.check_against(value, self.min, self.max)
    }

    /// Check an `f32` field, comparing at `f32` precision
    ///
    /// Bounds such as 0.6 are not exactly representable, so the bound is
    /// rounded the same way the value was.
    pub fn check_f32(&self, value: f32) -> Result<()> {
        let round = |bound: f64| f64::from(bound as f32);
        self.check_against(f64::from(value), round(self.min), self.max.map(round))
    }

    fn check_against(&self, value: f64, min: f64, max: Option<f64>) -> Result<()> {
        if !value.is_finite() {
            return Err(self.reject(value, "must be a finite number"));
        }
        if self.integer && value.fract() != 0.0 {
            return Err(self.reject(value, "must be a whole number"));
        }
        if self.min_exclusive && value <= min {
            return Err(self.reject(value, format!("must be > {}", self.min)));
        }
        if !self.min_exclusive && value < min {
            return Err(self.reject(value, format!("must be >= {}", self.min)));
        }
        if let Some(max) = max {
            if value > max {
                return Err(self.reject(value, format!("must be <= {}", max)));
            }
        }
        Ok(())
    }

    /// Read this field from a raw parameter object
    ///
    /// Returns `None` when the field is absent or `null`.
    pub fn read(&self, raw: &Map<String, Value>) -> Result<Option<f64>> {
        let value = match raw.get(self.name) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| self.reject(n, "is not representable as a number"))?,
            Some(other) => return Err(self.reject(other, "expected a number")),
        };
        self.check(value)?;
        Ok(Some(value))
    }

    /// Read the field, falling back to its default
    pub fn read_or_default(&self, raw: &Map<String, Value>) -> Result<f64> {
        Ok(self.read(raw)?.or(self.default).unwrap_or(self.min))
    }

    fn reject(&self, value: impl fmt::Display, reason: impl Into<String>) -> EffectError {
        EffectError::invalid_parameter(self.name, value, reason)
    }
}

/// Catalogue entry: identifier, human-facing text and fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectDescriptor {
    pub kind: EffectKind,
    pub label: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
    /// Values accepted by the `preset` key; empty when the effect has none
    pub presets: &'static [&'static str],
}

impl EffectDescriptor {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `key` is read by this effect
    pub fn accepts(&self, key: &str) -> bool {
        self.field(key).is_some() || (key == PRESET_KEY && !self.presets.is_empty())
    }
}

const fn field(
    name: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    default: f64,
    step: f64,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        min,
        min_exclusive: false,
        max: Some(max),
        default: Some(default),
        step,
        integer: false,
    }
}

const fn int_field(
    name: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    default: f64,
    step: f64,
) -> FieldSpec {
    FieldSpec {
        integer: true,
        ..field(name, label, min, max, default, step)
    }
}

pub const TRIM_START_TIME: FieldSpec = FieldSpec {
    name: "start_time",
    label: "Start (sec)",
    min: 0.0,
    min_exclusive: false,
    max: None,
    default: Some(0.0),
    step: 0.1,
    integer: false,
};

pub const TRIM_END_TIME: FieldSpec = FieldSpec {
    name: "end_time",
    label: "End (sec)",
    min: 0.0,
    min_exclusive: true,
    max: None,
    default: None,
    step: 0.1,
    integer: false,
};

pub const PITCH_SEMITONES: FieldSpec = field("semitones", "Semitones", -12.0, 12.0, 0.0, 0.5);

pub const REVERB_DECAY: FieldSpec = field("decay", "Decay", 0.1, 0.9, 0.5, 0.05);
pub const REVERB_DELAY_MS: FieldSpec = int_field("delay_ms", "Delay (ms)", 50.0, 300.0, 100.0, 10.0);

pub const WIDEN_DELAY_MS: FieldSpec =
    int_field("delay_ms", "Channel Delay (ms)", 5.0, 20.0, 10.0, 1.0);
pub const WIDEN_GAIN_DIFF_DB: FieldSpec =
    field("gain_diff_db", "Gain Diff (dB)", 0.0, 6.0, 1.5, 0.5);

pub const EIGHT_D_PAN_SPEED_HZ: FieldSpec =
    field("pan_speed_hz", "Pan Speed (Hz)", 0.05, 1.0, 0.15, 0.05);
pub const EIGHT_D_INTENSITY: FieldSpec = field("intensity", "Intensity", 0.1, 1.0, 0.8, 0.05);
pub const EIGHT_D_CROSSFEED: FieldSpec = field("crossfeed", "Crossfeed", 0.0, 0.6, 0.3, 0.05);

/// Request key selecting a preset as the starting point
pub const PRESET_KEY: &str = "preset";

/// Equalizer preset identifiers, in `EqPreset::ALL` order
pub const EQ_PRESET_IDS: [&str; 5] = ["flat", "bass_boost", "treble_boost", "v_shape", "vocal"];

/// One gain field per equalizer band, in `EqBand::ALL` order
pub const EQ_BAND_FIELDS: [FieldSpec; 7] = [
    field("sub_bass", "60 Hz gain dB", -12.0, 12.0, 0.0, 0.5),
    field("bass", "170 Hz gain dB", -12.0, 12.0, 0.0, 0.5),
    field("low_mid", "500 Hz gain dB", -12.0, 12.0, 0.0, 0.5),
    field("mid", "1 kHz gain dB", -12.0, 12.0, 0.0, 0.5),
    field("high_mid", "3 kHz gain dB", -12.0, 12.0, 0.0, 0.5),
    field("presence", "6 kHz gain dB", -12.0, 12.0, 0.0, 0.5),
    field("brilliance", "12 kHz gain dB", -12.0, 12.0, 0.0, 0.5),
];

static REVERSE_DESCRIPTOR: EffectDescriptor = EffectDescriptor {
    kind: EffectKind::Reverse,
    label: "Reverse Audio",
    description: "Flip the entire audio signal so it plays backward.",
    fields: &[],
    presets: &[],
};

static PITCH_SHIFT_DESCRIPTOR: EffectDescriptor = EffectDescriptor {
    kind: EffectKind::PitchShift,
    label: "Pitch Shifter",
    description: "Shift the pitch up or down while preserving duration.",
    fields: &[PITCH_SEMITONES],
    presets: &[],
};

static REVERB_DESCRIPTOR: EffectDescriptor = EffectDescriptor {
    kind: EffectKind::Reverb,
    label: "Reverb",
    description: "Add echo-based reverb for a spacious, ambient feel.",
    fields: &[REVERB_DECAY, REVERB_DELAY_MS],
    presets: &[],
};

static STEREO_WIDEN_DESCRIPTOR: EffectDescriptor = EffectDescriptor {
    kind: EffectKind::StereoWiden,
    label: "3D Audio (Stereo Widen)",
    description: "Widen the stereo field for an immersive 3D feel.",
    fields: &[WIDEN_DELAY_MS, WIDEN_GAIN_DIFF_DB],
    presets: &[],
};

static TRIM_DESCRIPTOR: EffectDescriptor = EffectDescriptor {
    kind: EffectKind::Trim,
    label: "Trim / Cut",
    description: "Extract a section of the audio by start and end time.",
    fields: &[TRIM_START_TIME, TRIM_END_TIME],
    presets: &[],
};

static EIGHT_D_DESCRIPTOR: EffectDescriptor = EffectDescriptor {
    kind: EffectKind::EightDAudio,
    label: "8D Audio",
    description: "Pans audio around your head for an immersive 8D experience. Use headphones!",
    fields: &[EIGHT_D_PAN_SPEED_HZ, EIGHT_D_INTENSITY, EIGHT_D_CROSSFEED],
    presets: &[],
};

static EQUALIZER_DESCRIPTOR: EffectDescriptor = EffectDescriptor {
    kind: EffectKind::Equalizer,
    label: "Equalizer",
    description: "7-band parametric EQ to shape your sound with precision.",
    fields: &EQ_BAND_FIELDS,
    presets: &EQ_PRESET_IDS,
};

/// Schema of every effect, in catalogue order
pub fn catalogue() -> Vec<&'static EffectDescriptor> {
    EffectKind::ALL.iter().map(EffectKind::descriptor).collect()
}

/// Validated, ready-to-run parameter set
#[derive(Debug, Clone, PartialEq)]
pub enum EffectParams {
    Reverse,
    Trim(TrimParams),
    PitchShift(PitchShiftParams),
    Reverb(ReverbParams),
    StereoWiden(StereoWidenParams),
    EightDAudio(EightDParams),
    Equalizer(EqualizerParams),
}

impl EffectParams {
    /// Read and validate raw parameters for `kind`
    ///
    /// `null` is treated as an empty object; any other non-object value is
    /// rejected. Absent fields take their documented defaults.
    pub fn parse(kind: EffectKind, raw: &Value) -> Result<Self> {
        let empty = Map::new();
        let map = match raw {
            Value::Null => &empty,
            Value::Object(map) => map,
            other => {
                return Err(EffectError::invalid_parameter(
                    "parameters",
                    other,
                    "expected an object",
                ))
            }
        };

        let params = match kind {
            EffectKind::Reverse => Self::Reverse,
            EffectKind::Trim => Self::Trim(TrimParams {
                start_time: TRIM_START_TIME.read_or_default(map)?,
                end_time: TRIM_END_TIME.read(map)?,
            }),
            EffectKind::PitchShift => Self::PitchShift(PitchShiftParams {
                semitones: PITCH_SEMITONES.read_or_default(map)? as f32,
            }),
            EffectKind::Reverb => Self::Reverb(ReverbParams {
                decay: REVERB_DECAY.read_or_default(map)? as f32,
                delay_ms: REVERB_DELAY_MS.read_or_default(map)? as u32,
            }),
            EffectKind::StereoWiden => Self::StereoWiden(StereoWidenParams {
                delay_ms: WIDEN_DELAY_MS.read_or_default(map)? as u32,
                gain_diff_db: WIDEN_GAIN_DIFF_DB.read_or_default(map)? as f32,
            }),
            EffectKind::EightDAudio => Self::EightDAudio(EightDParams {
                pan_speed_hz: EIGHT_D_PAN_SPEED_HZ.read_or_default(map)? as f32,
                intensity: EIGHT_D_INTENSITY.read_or_default(map)? as f32,
                crossfeed: EIGHT_D_CROSSFEED.read_or_default(map)? as f32,
            }),
            EffectKind::Equalizer => {
                // Explicit band gains override the preset's
                let mut params = read_preset(map)?.map_or_else(
                    EqualizerParams::default,
                    EqualizerParams::from_preset,
                );
                for (gain, spec) in params.gains.iter_mut().zip(EQ_BAND_FIELDS.iter()) {
                    if let Some(value) = spec.read(map)? {
                        *gain = value as f32;
                    }
                }
                Self::Equalizer(params)
            }
        };

        params.validate()?;
        Ok(params)
    }

    /// Re-check every field against its bounds
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Reverse => Ok(()),
            Self::Trim(p) => p.validate(),
            Self::PitchShift(p) => p.validate(),
            Self::Reverb(p) => p.validate(),
            Self::StereoWiden(p) => p.validate(),
            Self::EightDAudio(p) => p.validate(),
            Self::Equalizer(p) => p.validate(),
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Reverse => EffectKind::Reverse,
            Self::Trim(_) => EffectKind::Trim,
            Self::PitchShift(_) => EffectKind::PitchShift,
            Self::Reverb(_) => EffectKind::Reverb,
            Self::StereoWiden(_) => EffectKind::StereoWiden,
            Self::EightDAudio(_) => EffectKind::EightDAudio,
            Self::Equalizer(_) => EffectKind::Equalizer,
        }
    }
}

fn read_preset(raw: &Map<String, Value>) -> Result<Option<EqPreset>> {
    match raw.get(PRESET_KEY) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => EqPreset::from_id(id).map(Some).ok_or_else(|| {
            EffectError::invalid_parameter(
                PRESET_KEY,
                id,
                format!("expected one of {}", EQ_PRESET_IDS.join(", ")),
            )
        }),
        Some(other) => Err(EffectError::invalid_parameter(
            PRESET_KEY,
            other,
            "expected a preset name",
        )),
    }
}

/// A parsed request: one effect plus its validated parameters
#[derive(Debug, Clone, PartialEq)]
pub struct EffectRequest {
    pub kind: EffectKind,
    pub params: EffectParams,
    /// Keys present in the raw object that the effect does not use
    pub ignored_keys: Vec<String>,
}

impl EffectRequest {
    /// Resolve the effect name and validate its raw parameters
    pub fn parse(effect: &str, raw: &Value) -> Result<Self> {
        let kind: EffectKind = effect.parse()?;
        let params = EffectParams::parse(kind, raw)?;
        let descriptor = kind.descriptor();
        let ignored_keys = raw
            .as_object()
            .map(|map| {
                map.keys()
                    .filter(|key| !descriptor.accepts(key))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            kind,
            params,
            ignored_keys,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EqBand;
    use serde_json::json;

    #[test]
    fn effect_names_roundtrip() {
        for kind in EffectKind::ALL {
            assert_eq!(kind.as_str().parse::<EffectKind>().unwrap(), kind);
            assert_eq!(kind.descriptor().kind, kind);
        }
    }

    #[test]
    fn unknown_effect_rejected() {
        let err = "flanger".parse::<EffectKind>().unwrap_err();
        assert!(matches!(err, EffectError::UnknownEffect(name) if name == "flanger"));
    }

    #[test]
    fn defaults_applied_when_absent() {
        let params = EffectParams::parse(EffectKind::Reverb, &json!({})).unwrap();
        assert_eq!(
            params,
            EffectParams::Reverb(ReverbParams {
                decay: 0.5,
                delay_ms: 100
            })
        );

        let params = EffectParams::parse(EffectKind::EightDAudio, &Value::Null).unwrap();
        assert_eq!(params, EffectParams::EightDAudio(EightDParams::default()));
    }

    #[test]
    fn out_of_bounds_names_field() {
        let err = EffectParams::parse(EffectKind::Reverb, &json!({"decay": 0.95})).unwrap_err();
        assert_eq!(err.field(), Some("decay"));

        let err =
            EffectParams::parse(EffectKind::PitchShift, &json!({"semitones": -13})).unwrap_err();
        assert_eq!(err.field(), Some("semitones"));
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(EffectParams::parse(EffectKind::Reverb, &json!({"decay": 0.9, "delay_ms": 50})).is_ok());
        assert!(EffectParams::parse(EffectKind::EightDAudio, &json!({"crossfeed": 0.0})).is_ok());
    }

    #[test]
    fn f32_upper_bounds_accepted() {
        let params = EightDParams {
            pan_speed_hz: 1.0,
            intensity: 1.0,
            crossfeed: 0.6,
        };
        assert!(params.validate().is_ok());
        assert!(EffectParams::parse(EffectKind::EightDAudio, &json!({"crossfeed": 0.6})).is_ok());
        assert!(EIGHT_D_CROSSFEED.check_f32(0.61).is_err());
    }

    #[test]
    fn malformed_values_rejected() {
        let err =
            EffectParams::parse(EffectKind::Reverb, &json!({"decay": "loud"})).unwrap_err();
        assert_eq!(err.field(), Some("decay"));

        let err =
            EffectParams::parse(EffectKind::Reverb, &json!({"delay_ms": 100.5})).unwrap_err();
        assert_eq!(err.field(), Some("delay_ms"));

        let err = EffectParams::parse(EffectKind::Reverb, &json!([1, 2])).unwrap_err();
        assert_eq!(err.field(), Some("parameters"));
    }

    #[test]
    fn trim_end_must_be_positive() {
        let err =
            EffectParams::parse(EffectKind::Trim, &json!({"end_time": 0.0})).unwrap_err();
        assert_eq!(err.field(), Some("end_time"));

        let params = EffectParams::parse(EffectKind::Trim, &json!({})).unwrap();
        assert_eq!(
            params,
            EffectParams::Trim(TrimParams {
                start_time: 0.0,
                end_time: None
            })
        );
    }

    #[test]
    fn equalizer_reads_band_names() {
        let params =
            EffectParams::parse(EffectKind::Equalizer, &json!({"bass": 10.0, "presence": -4}))
                .unwrap();
        let EffectParams::Equalizer(eq) = params else {
            panic!("expected equalizer params");
        };
        assert_eq!(eq.gain_db(EqBand::Bass), 10.0);
        assert_eq!(eq.gain_db(EqBand::Presence), -4.0);
        assert_eq!(eq.gain_db(EqBand::Mid), 0.0);
    }

    #[test]
    fn request_collects_ignored_keys() {
        let request = EffectRequest::parse("reverse", &json!({"speed": 2})).unwrap();
        assert_eq!(request.kind, EffectKind::Reverse);
        assert_eq!(request.ignored_keys, vec!["speed".to_string()]);
    }

    #[test]
    fn equalizer_preset_with_overrides() {
        let params = EffectParams::parse(
            EffectKind::Equalizer,
            &json!({"preset": "bass_boost", "sub_bass": -3.0}),
        )
        .unwrap();
        let EffectParams::Equalizer(eq) = params else {
            panic!("expected equalizer params");
        };
        assert_eq!(eq.gain_db(EqBand::SubBass), -3.0);
        assert_eq!(eq.gain_db(EqBand::Bass), 5.0);
        assert_eq!(eq.gain_db(EqBand::Brilliance), 0.0);
    }

    #[test]
    fn equalizer_rejects_unknown_preset() {
        let err = EffectParams::parse(EffectKind::Equalizer, &json!({"preset": "loudness"}))
            .unwrap_err();
        assert_eq!(err.field(), Some("preset"));

        let err =
            EffectParams::parse(EffectKind::Equalizer, &json!({"preset": 3})).unwrap_err();
        assert_eq!(err.field(), Some("preset"));
    }

    #[test]
    fn preset_ids_match_presets() {
        let ids: Vec<&str> = EqPreset::ALL.iter().map(EqPreset::id).collect();
        assert_eq!(ids, EQ_PRESET_IDS);
        for id in EQ_PRESET_IDS {
            assert_eq!(EqPreset::from_id(id).map(|p| p.id()), Some(id));
        }
    }

    #[test]
    fn preset_key_only_accepted_by_equalizer() {
        let request = EffectRequest::parse("equalizer", &json!({"preset": "vocal"})).unwrap();
        assert!(request.ignored_keys.is_empty());

        let request = EffectRequest::parse("reverb", &json!({"preset": "vocal"})).unwrap();
        assert_eq!(request.ignored_keys, vec!["preset".to_string()]);
    }

    #[test]
    fn catalogue_lists_every_effect() {
        let entries = catalogue();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0].kind, EffectKind::Reverse);
        assert_eq!(EffectKind::Reverb.descriptor().field("delay_ms").unwrap().default, Some(100.0));
    }
}
