//! # Arpeggio - Real-time Arpeggiator Engine
//!
//! Turns a set of held notes into a timed, repeating note pattern.
//!
//! ## Architecture
//!
//! Arpeggio is an umbrella crate that coordinates:
//! - **arpeggio-core** - Note registry, pattern sequencer, scheduler, params, event sinks
//! - **arpeggio-midi** - MIDI event type and lock-free note output queue
//!
//! ## Quick Start
//!
//! ```ignore
//! use arpeggio::prelude::*;
//!
//! let (output, mut receiver) = note_output(0)?;
//! let engine = ArpEngine::builder()
//!     .tempo(120.0)
//!     .clock_division(16)
//!     .sink(MidiSink::new(output))
//!     .build()?;
//!
//! engine.note_on(60, 100)?;
//! engine.note_on(64, 100)?;
//! engine.note_on(67, 100)?;
//! engine.enable();
//!
//! let runner = engine.spawn_runner()?;
//! for event in receiver.drain_due(engine.now()) {
//!     // forward to a synth or MIDI port
//! }
//! ```
//!
//! ## Driving the engine
//!
//! - [`ArpEngine::spawn_runner`] - background thread, wall-clock timing
//! - [`ArpEngine::poll`] - host calls at or after [`ArpEngine::next_deadline`],
//!   e.g. once per audio block, or step-by-step with a [`ManualClock`]

/// Re-export of arpeggio-core for direct access
pub use arpeggio_core as core;

/// Re-export of arpeggio-midi for direct access
pub use arpeggio_midi as midi;

pub use arpeggio_core::{
    advance,
    interval_ms,
    // Params
    ArpDirection,
    // Events
    ArpEvent,
    ArpParams,
    // Timing
    Clock,
    EventSink,
    FireReport,
    // Notes
    HeldNote,
    HeldSet,
    ManualClock,
    MidiSink,
    NoteRegistry,
    NullSink,
    RotationStart,
    SchedulerState,
    StepInterval,
    SystemClock,
    TimedArpEvent,
    TransitionResult,
    DEFAULT_CLOCK_DIVISION,
    DEFAULT_TEMPO,
};

pub use arpeggio_midi::{
    note_output, note_output_with_capacity, MidiEvent, NoteOutput, NoteReceiver,
};

mod builder;
mod engine;
mod error;
mod runner;

pub use builder::ArpEngineBuilder;
pub use engine::ArpEngine;
pub use error::{Error, Result};
pub use runner::RunnerHandle;

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        note_output, ArpDirection, ArpEngine, ArpEvent, ArpParams, EventSink, HeldNote,
        ManualClock, MidiEvent, MidiSink, RotationStart, RunnerHandle, SchedulerState,
        TimedArpEvent,
    };
    pub use crate::{Error, Result};
    pub use arpeggio_core::compat::Arc;
    pub use std::time::Duration;
}
