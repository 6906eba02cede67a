//! Centralized error type for the arpeggio umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] arpeggio_core::Error),

    #[error("MIDI: {0}")]
    Midi(#[from] arpeggio_midi::Error),

    #[error("A runner thread is already driving this engine")]
    RunnerActive,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
