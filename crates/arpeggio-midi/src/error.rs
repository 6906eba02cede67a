//! Error types for the MIDI event layer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("MIDI parse error: {0}")]
    Parse(String),

    #[error("Expected a channel voice message")]
    NotChannelVoice,

    #[error("Invalid MIDI channel: {0}. Must be between 0 and 15")]
    InvalidChannel(u8),

    #[error("Note output queue needs room for at least one event")]
    ZeroCapacity,
}

impl From<midi_msg::ParseError> for Error {
    fn from(e: midi_msg::ParseError) -> Self {
        Error::Parse(format!("{:?}", e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
