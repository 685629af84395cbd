//! Subcommand implementations
//!
//! Each command is a plain function so the binary and the integration tests
//! drive exactly the same code.

use crate::config::AppConfig;
use anyhow::{bail, Context};
use audiolab_codec::validation::{validate_extension, validate_size};
use audiolab_codec::{audio_info, SymphoniaDecoder, WavEncoder};
use audiolab_core::{AudioDecoder, AudioEncoder, AudioInfo, SignalBuffer};
use audiolab_dsp::params::EffectDescriptor;
use audiolab_dsp::Dispatcher;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// One `process` invocation
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub effect: String,
    /// Raw effect parameters; `Value::Null` means all defaults
    pub params: Value,
}

/// Printed after a successful `process`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessReport {
    pub input: String,
    pub output: String,
    pub effect: String,
    pub processing_time_seconds: f64,
    pub input_info: AudioInfo,
    pub output_info: AudioInfo,
}

/// Decode `input`, apply one effect and write the result as WAV
pub fn process(config: &AppConfig, request: &ProcessRequest) -> anyhow::Result<ProcessReport> {
    let started = Instant::now();

    let buffer = load(config, &request.input)?;

    let dispatcher = Dispatcher::new()
        .with_target_peak(config.target_peak)
        .context("Invalid target peak")?;
    let output = dispatcher
        .apply(&buffer, &request.effect, &request.params)
        .with_context(|| format!("Failed to apply effect '{}'", request.effect))?;

    let mut encoder = WavEncoder::default();
    if !has_extension(&request.output, encoder.extension()) {
        warn!(
            output = %request.output.display(),
            "Output is always WAV; file extension does not match"
        );
    }
    let bytes = encoder.encode(&output).context("Failed to encode output")?;
    fs::write(&request.output, &bytes)
        .with_context(|| format!("Failed to write {}", request.output.display()))?;

    let elapsed = started.elapsed().as_secs_f64();
    info!(
        effect = %request.effect,
        elapsed_seconds = elapsed,
        output_bytes = bytes.len(),
        "Processed file"
    );

    Ok(ProcessReport {
        input: request.input.display().to_string(),
        output: request.output.display().to_string(),
        effect: request.effect.clone(),
        processing_time_seconds: (elapsed * 1000.0).round() / 1000.0,
        input_info: audio_info(&buffer),
        output_info: audio_info(&output),
    })
}

/// Decode `input` and summarize it
pub fn inspect(config: &AppConfig, input: &Path) -> anyhow::Result<AudioInfo> {
    let buffer = load(config, input)?;
    Ok(audio_info(&buffer))
}

/// Schema of every effect the dispatcher knows
pub fn describe_effects() -> Vec<&'static EffectDescriptor> {
    Dispatcher::new().describe()
}

/// Resolve `--params` / `--params-file` into one JSON value
///
/// Neither flag yields `Value::Null`, which the dispatcher treats as
/// "all defaults".
pub fn read_params(inline: Option<&str>, file: Option<&Path>) -> anyhow::Result<Value> {
    match (inline, file) {
        (Some(_), Some(_)) => bail!("--params and --params-file are mutually exclusive"),
        (Some(json), None) => serde_json::from_str(json).context("--params is not valid JSON"),
        (None, Some(path)) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", path.display()))
        }
        (None, None) => Ok(Value::Null),
    }
}

fn load(config: &AppConfig, input: &Path) -> anyhow::Result<SignalBuffer> {
    let filename = input.display().to_string();
    let extension = validate_extension(&filename, &config.allowed_extensions)
        .with_context(|| format!("Rejected {}", filename))?;

    let bytes = fs::read(input).with_context(|| format!("Failed to read {}", filename))?;
    validate_size(bytes.len(), config.max_file_size_bytes())
        .with_context(|| format!("Rejected {}", filename))?;

    let buffer = SymphoniaDecoder::new()
        .decode(&bytes, Some(extension.trim_start_matches('.')))
        .with_context(|| format!("Failed to decode {}", filename))?;

    debug!(
        input = %filename,
        frames = buffer.frames(),
        channels = buffer.channel_count(),
        sample_rate = buffer.sample_rate().as_hz(),
        "Decoded input"
    );
    Ok(buffer)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_default_to_null() {
        assert_eq!(read_params(None, None).unwrap(), Value::Null);
    }

    #[test]
    fn inline_params_parse() {
        let value = read_params(Some(r#"{"decay": 0.4}"#), None).unwrap();
        assert_eq!(value, json!({"decay": 0.4}));
    }

    #[test]
    fn params_sources_are_exclusive() {
        let err = read_params(Some("{}"), Some(Path::new("params.json"))).unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn malformed_inline_params() {
        assert!(read_params(Some("{decay: }"), None).is_err());
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_extension(Path::new("out.WAV"), "wav"));
        assert!(!has_extension(Path::new("out.mp3"), "wav"));
        assert!(!has_extension(Path::new("out"), "wav"));
    }
}
