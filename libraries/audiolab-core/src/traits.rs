//! Collaborator traits consumed around the DSP core

use crate::buffer::SignalBuffer;
use crate::error::Result;

/// Audio decoder trait
///
/// Implementers turn an encoded container (MP3, WAV, FLAC, ...) into a
/// `SignalBuffer` at the file's native sample rate.
pub trait AudioDecoder: Send {
    /// Decode a complete in-memory file
    ///
    /// `extension_hint` is the file extension without the dot, used to help
    /// format probing.
    fn decode(&mut self, bytes: &[u8], extension_hint: Option<&str>) -> Result<SignalBuffer>;

    /// Check if the decoder handles the given extension (without the dot)
    fn supports_extension(&self, extension: &str) -> bool;
}

/// Audio encoder trait
///
/// Implementers serialize a `SignalBuffer` to a complete in-memory file.
pub trait AudioEncoder: Send {
    /// Encode the buffer
    fn encode(&mut self, buffer: &SignalBuffer) -> Result<Vec<u8>>;

    /// File extension (without the dot) of the produced container
    fn extension(&self) -> &'static str;
}
