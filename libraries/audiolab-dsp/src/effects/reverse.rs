//! Time reversal

use crate::error::Result;
use audiolab_core::SignalBuffer;

/// Reverse every channel so the signal plays backward
///
/// Channel count and length are preserved; applying it twice is the identity.
pub fn reverse(buffer: &SignalBuffer) -> Result<SignalBuffer> {
    Ok(buffer.map_channels(|channel| channel.iter().rev().copied().collect())?)
}
