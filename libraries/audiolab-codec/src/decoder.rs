//! Audio decoder implementation using Symphonia

use audiolab_core::{AudioDecoder, CoreError, Result, SampleRate, SignalBuffer};
use std::io::Cursor;
use symphonia::core::audio::{AudioBuffer, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// ITU-R BS.775-1 coefficient for centre and surround channels (-3 dB)
const SURROUND_MIX: f32 = 0.707;

/// Extensions (without the dot) the bundled Symphonia codecs handle
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "oga", "flac", "m4a", "mp4", "aac"];

/// Audio decoder using Symphonia
///
/// Supports: MP3, WAV, OGG/Vorbis, FLAC, M4A/AAC
///
/// Decodes a complete in-memory file. Mono and stereo sources keep their
/// layout; anything wider is folded down to stereo.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&mut self, bytes: &[u8], extension_hint: Option<&str>) -> Result<SignalBuffer> {
        let source = Cursor::new(bytes.to_vec());
        let mss = MediaSourceStream::new(Box::new(source), MediaSourceStreamOptions::default());

        // Help the format registry guess the container
        let mut hint = Hint::new();
        if let Some(ext) = extension_hint {
            hint.with_extension(ext.trim_start_matches('.'));
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| CoreError::UnsupportedFormat(format!("Failed to probe input: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| CoreError::decode("No audio tracks found"))?;
        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| CoreError::UnsupportedFormat(format!("Failed to create decoder: {}", e)))?;

        debug!(
            codec = ?codec_params.codec,
            sample_rate = ?codec_params.sample_rate,
            channels = ?codec_params.channels.map(|c| c.count()),
            frames = ?codec_params.n_frames,
            "Probed input"
        );

        let mut sample_rate = codec_params.sample_rate;
        let mut planar: Vec<Vec<f32>> = Vec::new();
        let mut skipped = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(CoreError::decode(format!("Error reading packet: {}", e)));
                }
            };

            // Skip packets that are not for the default track
            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    sample_rate.get_or_insert(spec.rate);

                    let mut converted = AudioBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    decoded.convert(&mut converted);
                    append_planar(&mut planar, &converted);
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    skipped += 1;
                    warn!(error = %e, packet_ts = packet.ts(), "Skipping corrupt packet");
                }
                Err(e) => return Err(CoreError::decode(format!("Decode error: {}", e))),
            }
        }

        if skipped > 0 {
            warn!(skipped, "Decoded with corrupt packets skipped");
        }

        let sample_rate =
            sample_rate.ok_or_else(|| CoreError::decode("Input does not declare a sample rate"))?;
        if planar.first().map_or(true, Vec::is_empty) {
            return Err(CoreError::decode("No audio frames decoded"));
        }

        SignalBuffer::from_channels(downmix_to_stereo(planar), SampleRate::new(sample_rate))
    }

    fn supports_extension(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.').to_lowercase();
        SUPPORTED_EXTENSIONS.contains(&extension.as_str())
    }
}

fn append_planar(planar: &mut Vec<Vec<f32>>, buffer: &AudioBuffer<f32>) {
    let count = buffer.spec().channels.count();
    if planar.len() < count {
        planar.resize_with(count, Vec::new);
    }
    for (index, channel) in planar.iter_mut().enumerate().take(count) {
        channel.extend_from_slice(buffer.chan(index));
    }
}

/// Fold more than two channels down to stereo
///
/// Uses ITU-R BS.775-1 coefficients:
/// - L_out = L + 0.707*C + 0.707*Ls
/// - R_out = R + 0.707*C + 0.707*Rs
///
/// Layouts by channel count:
/// - 3: L, R, C
/// - 4: L, R, Ls, Rs
/// - 5: L, R, C, Ls, Rs
/// - 6+: L, R, C, LFE, Ls, Rs (LFE and any extra channels dropped)
///
/// Mono and stereo pass through untouched.
fn downmix_to_stereo(channels: Vec<Vec<f32>>) -> Vec<Vec<f32>> {
    let (center, surround_left, surround_right) = match channels.len() {
        0..=2 => return channels,
        3 => (Some(2), None, None),
        4 => (None, Some(2), Some(3)),
        5 => (Some(2), Some(3), Some(4)),
        _ => (Some(2), Some(4), Some(5)),
    };

    let frames = channels[0].len();
    let mix = |index: Option<usize>, frame: usize| {
        index
            .and_then(|c| channels[c].get(frame))
            .map_or(0.0, |s| s * SURROUND_MIX)
    };

    let (left, right): (Vec<f32>, Vec<f32>) = (0..frames)
        .map(|i| {
            let c = mix(center, i);
            (
                channels[0][i] + c + mix(surround_left, i),
                channels[1].get(i).copied().unwrap_or(0.0) + c + mix(surround_right, i),
            )
        })
        .unzip();

    vec![left, right]
}
