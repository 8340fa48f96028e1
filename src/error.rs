//! Error types for zenblock

use std::fmt;

/// Error type for zenblock operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Image too small to hold a single block
    InvalidDimensions {
        width: usize,
        height: usize,
        reason: &'static str,
    },
    /// Quantization scale is not a positive finite number
    InvalidQuality { value: f32 },
    /// Invalid pixel data
    InvalidPixelData { expected: usize, actual: usize },
    /// Run-length data that does not describe a well-formed block
    MalformedRun {
        block: usize,
        channel: usize,
        reason: String,
    },
    /// Decoding was attempted with a session that does not belong to the data
    SessionMismatch { reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDimensions {
                width,
                height,
                reason,
            } => {
                write!(f, "Invalid dimensions {}x{}: {}", width, height, reason)
            }
            Error::InvalidQuality { value } => {
                write!(f, "Quality {} must be a positive finite number", value)
            }
            Error::InvalidPixelData { expected, actual } => {
                write!(f, "Expected {} bytes of pixel data, got {}", expected, actual)
            }
            Error::MalformedRun {
                block,
                channel,
                reason,
            } => {
                write!(
                    f,
                    "Malformed run-length data in block {} channel {}: {}",
                    block, channel, reason
                )
            }
            Error::SessionMismatch { reason } => {
                write!(f, "Session does not match compressed data: {}", reason)
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Attach block and channel position to a run-length failure
    pub(crate) fn malformed(block: usize, channel: usize, reason: impl Into<String>) -> Self {
        Error::MalformedRun {
            block,
            channel,
            reason: reason.into(),
        }
    }

    /// Whether this error came from malformed compressed input
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::MalformedRun { .. })
    }

    /// Whether this error came from a missing or mismatched session
    #[must_use]
    pub fn is_precondition_error(&self) -> bool {
        matches!(self, Error::SessionMismatch { .. })
    }
}
