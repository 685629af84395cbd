//! Upload validation
//!
//! Checks run before any decoding: the file extension must be on the
//! allow-list and the payload must fit under the size limit.

use audiolab_core::{CoreError, Result};
use std::path::Path;

/// Extensions accepted by default
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 5] = ["mp3", "wav", "ogg", "flac", "m4a"];

/// Default upload limit in megabytes
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 20;

/// Convert a megabyte limit to bytes
pub fn megabytes(mb: usize) -> usize {
    mb.saturating_mul(1024 * 1024)
}

/// Check `filename` against `allowed` and return the normalized extension
///
/// Matching is case-insensitive and entries in `allowed` may be written with
/// or without the leading dot. The result is lower-case with a leading dot,
/// e.g. `".mp3"`.
pub fn validate_extension<S: AsRef<str>>(filename: &str, allowed: &[S]) -> Result<String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let is_allowed = !extension.is_empty()
        && allowed
            .iter()
            .any(|a| a.as_ref().trim_start_matches('.').eq_ignore_ascii_case(&extension));

    if !is_allowed {
        let mut listed: Vec<String> = allowed
            .iter()
            .map(|a| format!(".{}", a.as_ref().trim_start_matches('.').to_lowercase()))
            .collect();
        listed.sort();
        return Err(CoreError::UnsupportedFormat(format!(
            "Unsupported file type '.{}'. Allowed: {}",
            extension,
            listed.join(", ")
        )));
    }

    Ok(format!(".{}", extension))
}

/// Reject payloads larger than `limit` bytes
pub fn validate_size(size: usize, limit: usize) -> Result<()> {
    if size > limit {
        return Err(CoreError::InputTooLarge { size, limit });
    }
    Ok(())
}
