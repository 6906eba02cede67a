//! Arpeggiator kernel: held-note registry, pattern sequencer and scheduler.
//!
//! # Primary API
//!
//! - [`NoteRegistry`]: which notes are held, and how hard
//! - [`PatternSequencer`] / [`advance`]: which held note plays next
//! - [`Scheduler`]: enable state, timer slot and the firing algorithm
//! - [`ParamStore`]: lock-free snapshot of tempo, clock division and pattern settings
//! - [`EventSink`]: where note-on, note-off, tick and tempo-echo events go
//!
//! # Example
//!
//! ```ignore
//! use arpeggio_core::prelude::*;
//!
//! let registry = NoteRegistry::new();
//! registry.set_note(60, 100)?;
//! registry.set_note(64, 90)?;
//!
//! let mut scheduler = Scheduler::new();
//! let mut events: Vec<ArpEvent> = Vec::new();
//! scheduler.enable(Duration::ZERO);
//! scheduler.poll(Duration::ZERO, &registry, &ArpParams::default(), &mut events);
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod clock;
pub use clock::{Clock, ManualClock, SystemClock};

pub mod config;
pub use config::{ArpParams, ParamStore, DEFAULT_CLOCK_DIVISION, DEFAULT_TEMPO};

pub mod event;
pub use event::{ArpEvent, EventSink, MidiSink, NullSink, TimedArpEvent};

pub mod interval;
pub use interval::{interval_ms, StepInterval};

pub mod pattern;
pub use pattern::{advance, ArpDirection, PatternSequencer, RotationStart};

pub mod registry;
pub use registry::{HeldNote, HeldSet, NoteRegistry, NOTE_COUNT};

pub mod scheduler;
pub use scheduler::{FireReport, Scheduler, SchedulerState, TransitionResult};

/// Synchronization re-exports shared by the engine crates.
pub mod compat;

pub mod prelude {
    pub use crate::{
        advance, ArpDirection, ArpEvent, ArpParams, EventSink, HeldNote, NoteRegistry,
        PatternSequencer, RotationStart, Scheduler, SchedulerState,
    };
    pub use std::time::Duration;
}
