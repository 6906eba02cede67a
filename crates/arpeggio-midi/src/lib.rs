//! MIDI layer for the arpeggio engine.
//!
//! Provides a timestamped channel-voice event type and a lock-free note
//! queue the host drains on its own thread.
//!
//! # Example
//!
//! ```ignore
//! use arpeggio_midi::note_output;
//!
//! let (mut output, mut receiver) = note_output(0)?;
//! output.note_on(Duration::ZERO, 60, 100);
//!
//! for event in receiver.drain_due(block_end) {
//!     send_to_device(&event.to_bytes());
//! }
//! ```

pub mod error;
pub use error::{Error, Result};

pub(crate) mod event;
pub use event::MidiEvent;

pub mod output;
pub use output::{note_output, note_output_with_capacity, NoteOutput, NoteReceiver};

// Re-export essential upstream types (users shouldn't need to import midi-msg directly)
pub use midi_msg::{Channel, ChannelVoiceMsg, MidiMsg};

/// Highest valid MIDI note number.
pub const MAX_NOTE: u8 = 127;

/// Highest valid MIDI velocity.
pub const MAX_VELOCITY: u8 = 127;

/// Highest valid zero-based MIDI channel.
pub const MAX_CHANNEL: u8 = 15;
