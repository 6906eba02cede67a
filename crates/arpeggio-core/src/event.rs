//! Events emitted by the arpeggiator and the sinks that receive them.

use std::time::Duration;

use arpeggio_midi::NoteOutput;
use crossbeam_channel::Sender;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArpEvent {
    NoteOn { note: u8, velocity: u8 },
    /// Always velocity 0.
    NoteOff { note: u8 },
    /// Once per firing that sounds a note, independent of the note.
    Tick,
    /// Current tempo in BPM, when tempo echo is enabled.
    TempoEcho(f64),
}

impl ArpEvent {
    #[inline]
    pub fn note(&self) -> Option<u8> {
        match *self {
            ArpEvent::NoteOn { note, .. } | ArpEvent::NoteOff { note } => Some(note),
            ArpEvent::Tick | ArpEvent::TempoEcho(_) => None,
        }
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        matches!(self, ArpEvent::NoteOn { .. })
    }

    #[inline]
    pub fn is_note_off(&self) -> bool {
        matches!(self, ArpEvent::NoteOff { .. })
    }
}

/// An event stamped with the firing time it was produced at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedArpEvent {
    pub at: Duration,
    pub event: ArpEvent,
}

/// Destination for arpeggiator output.
///
/// Called with the scheduler lock held; implementations must not block.
pub trait EventSink: Send {
    fn emit(&mut self, at: Duration, event: ArpEvent);
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    #[inline]
    fn emit(&mut self, at: Duration, event: ArpEvent) {
        (**self).emit(at, event);
    }
}

impl EventSink for Vec<ArpEvent> {
    #[inline]
    fn emit(&mut self, _at: Duration, event: ArpEvent) {
        self.push(event);
    }
}

impl EventSink for Vec<TimedArpEvent> {
    #[inline]
    fn emit(&mut self, at: Duration, event: ArpEvent) {
        self.push(TimedArpEvent { at, event });
    }
}

impl EventSink for Sender<TimedArpEvent> {
    fn emit(&mut self, at: Duration, event: ArpEvent) {
        if self.try_send(TimedArpEvent { at, event }).is_err() {
            tracing::trace!("Event receiver full or gone, dropped {:?}", event);
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    #[inline]
    fn emit(&mut self, _at: Duration, _event: ArpEvent) {}
}

/// Sends note events to a [`NoteOutput`] queue, stamped with their firing
/// time. Ticks and tempo echoes have no MIDI form and are skipped.
pub struct MidiSink {
    output: NoteOutput,
}

impl MidiSink {
    pub fn new(output: NoteOutput) -> Self {
        Self { output }
    }

    #[inline]
    pub fn channel(&self) -> u8 {
        self.output.channel()
    }

    /// Notes lost because the queue was full.
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.output.dropped()
    }
}

impl EventSink for MidiSink {
    fn emit(&mut self, at: Duration, event: ArpEvent) {
        let sent = match event {
            ArpEvent::NoteOn { note, velocity } => self.output.note_on(at, note, velocity),
            ArpEvent::NoteOff { note } => self.output.note_off(at, note),
            ArpEvent::Tick | ArpEvent::TempoEcho(_) => return,
        };
        if !sent {
            tracing::warn!(
                "MIDI output full, dropped {:?} ({} total)",
                event,
                self.output.dropped()
            );
        }
    }
}
