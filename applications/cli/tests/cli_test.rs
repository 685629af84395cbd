//! End-to-end tests for the CLI commands against real files

use audiolab_cli::commands::{describe_effects, inspect, process, read_params, ProcessRequest};
use audiolab_cli::config::AppConfig;
use audiolab_codec::{SymphoniaDecoder, WavEncoder};
use audiolab_core::{AudioDecoder, AudioEncoder, SampleRate, SignalBuffer};
use serde_json::{json, Value};
use std::f32::consts::PI;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

fn write_tone(path: &Path, frames: usize, sample_rate: u32) {
    let samples: Vec<f32> = (0..frames)
        .map(|i| 0.5 * (2.0 * PI * 440.0 * i as f32 / sample_rate as f32).sin())
        .collect();
    let buffer = SignalBuffer::mono(samples, SampleRate::new(sample_rate)).unwrap();
    let bytes = WavEncoder::default().encode(&buffer).unwrap();
    fs::write(path, bytes).unwrap();
}

fn request(dir: &TempDir, effect: &str, params: Value) -> ProcessRequest {
    let input = dir.path().join("input.wav");
    write_tone(&input, 8000, 8000);
    ProcessRequest {
        input,
        output: dir.path().join("output.wav"),
        effect: effect.to_string(),
        params,
    }
}

#[test]
fn process_writes_normalized_wav() {
    let dir = TempDir::new().unwrap();
    let request = request(&dir, "reverb", json!({"decay": 0.4, "delay_ms": 100}));

    let report = process(&AppConfig::default(), &request).unwrap();
    assert_eq!(report.effect, "reverb");
    assert_eq!(report.input_info.frames, 8000);
    assert_eq!(report.input_info.duration_seconds, 1.0);
    // 5 reflections of 800 samples
    assert_eq!(report.output_info.frames, 8000 + 5 * 800);
    assert!(report.processing_time_seconds >= 0.0);

    let bytes = fs::read(&request.output).unwrap();
    let decoded = SymphoniaDecoder::new().decode(&bytes, Some("wav")).unwrap();
    assert_eq!(decoded.frames(), 12_000);
    assert!((decoded.peak() - 0.95).abs() < 1e-3);
}

#[test]
fn stereo_widen_promotes_mono_file() {
    let dir = TempDir::new().unwrap();
    let report = process(&AppConfig::default(), &request(&dir, "stereo_widen", Value::Null)).unwrap();
    assert_eq!(report.input_info.channels, 1);
    assert_eq!(report.output_info.channels, 2);
}

#[test]
fn unknown_effect_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = process(&AppConfig::default(), &request(&dir, "bitcrush", Value::Null)).unwrap_err();
    assert!(format!("{:#}", err).contains("Unknown effect: bitcrush"));
    assert!(!dir.path().join("output.wav").exists());
}

#[test]
fn disallowed_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.aiff");
    write_tone(&input, 100, 8000);

    let err = inspect(&AppConfig::default(), &input).unwrap_err();
    assert!(format!("{:#}", err).contains("Unsupported file type"));
}

#[test]
fn oversized_input_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.wav");
    // 2 MiB of 16-bit mono PCM
    write_tone(&input, 1024 * 1024 + 1, 8000);

    let config = AppConfig {
        max_file_size_mb: 1,
        ..AppConfig::default()
    };
    let err = inspect(&config, &input).unwrap_err();
    assert!(format!("{:#}", err).contains("exceeds"));
}

#[test]
fn inspect_reports_info() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tone.WAV");
    write_tone(&input, 12_345, 10_000);

    let info = inspect(&AppConfig::default(), &input).unwrap();
    assert_eq!(info.sample_rate, 10_000);
    assert_eq!(info.channels, 1);
    assert_eq!(info.duration_seconds, 1.23);
}

#[test]
fn effects_listing_serializes() {
    let listing = serde_json::to_value(describe_effects()).unwrap();
    let kinds: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds.len(), 7);
    assert!(kinds.contains(&"eight_d_audio"));
    assert!(kinds.contains(&"pitch_shift"));
}

#[test]
fn params_file_is_read() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"start_time": 0.5}}"#).unwrap();

    let value = read_params(None, Some(file.path())).unwrap();
    assert_eq!(value, json!({"start_time": 0.5}));
}

#[test]
fn config_file_overrides_defaults() {
    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(file, "target_peak = 0.5").unwrap();
    writeln!(file, r#"allowed_extensions = ["wav"]"#).unwrap();

    let config = AppConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.target_peak, 0.5);
    assert_eq!(config.allowed_extensions, ["wav"]);
    assert_eq!(config.max_file_size_mb, 20);
}

#[test]
fn config_file_is_validated() {
    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(file, "target_peak = 1.5").unwrap();

    assert!(AppConfig::load(Some(file.path())).is_err());
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(AppConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
}

#[test]
fn configured_target_peak_applies() {
    let dir = TempDir::new().unwrap();
    let request = request(&dir, "reverse", Value::Null);
    let config = AppConfig {
        target_peak: 0.5,
        ..AppConfig::default()
    };

    process(&config, &request).unwrap();
    let bytes = fs::read(&request.output).unwrap();
    let decoded = SymphoniaDecoder::new().decode(&bytes, Some("wav")).unwrap();
    assert!((decoded.peak() - 0.5).abs() < 1e-3);
}
