//! Core error types for Audio Lab

use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Audio Lab
#[derive(Error, Debug)]
pub enum CoreError {
    /// Buffer layout violates the mono/stereo equal-length invariant
    #[error("Invalid signal buffer: {0}")]
    InvalidBuffer(String),

    /// Sample rate must be positive
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// Container or codec not supported by a collaborator
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error
    #[error("Decode error: {0}")]
    Decode(String),

    /// Encoding error
    #[error("Encode error: {0}")]
    Encode(String),

    /// Input exceeds the configured size limit
    #[error("Input of {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge {
        /// Input length in bytes
        size: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Create an invalid buffer error
    pub fn invalid_buffer(msg: impl Into<String>) -> Self {
        Self::InvalidBuffer(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an encode error
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
