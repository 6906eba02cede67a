//! Error types for arpeggio-core.

use thiserror::Error;

/// Error type for arpeggiator operations.
///
/// Every variant is recoverable: a rejected update leaves the previous state
/// in effect.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid note number: {0}. Must be between 0 and 127")]
    InvalidNoteNumber(i32),

    #[error("Invalid velocity: {0}. Must be non-negative")]
    InvalidVelocity(i32),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Degenerate step interval: {0} ms")]
    DegenerateInterval(f64),
}

impl Error {
    pub(crate) fn invalid_param(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
