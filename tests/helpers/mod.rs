//! Test helpers and fixtures for arpeggio integration tests
//!
//! Most tests drive the engine from a [`ManualClock`] so every firing lands on
//! an exact, reproducible timestamp. Only the runner tests touch wall time,
//! and those use the loose bounds in [`tolerances`].

#![allow(dead_code)]

pub mod tolerances;

use arpeggio::prelude::*;
use arpeggio::FireReport;
use crossbeam_channel::Receiver;

/// Engine on a manual clock, with every emitted event captured.
pub struct TestRig {
    pub engine: ArpEngine,
    pub clock: Arc<ManualClock>,
    pub events: Receiver<TimedArpEvent>,
}

impl TestRig {
    pub fn new(tempo: f64, clock_division: u32) -> Self {
        let clock = Arc::new(ManualClock::new());
        let (tx, events) = crossbeam_channel::unbounded();
        let engine = ArpEngine::builder()
            .tempo(tempo)
            .clock_division(clock_division)
            .clock(clock.clone())
            .sink(tx)
            .build()
            .expect("Failed to create test engine");
        Self {
            engine,
            clock,
            events,
        }
    }

    pub fn hold(&self, notes: &[u8]) {
        for &note in notes {
            self.engine
                .note_on(note, 100)
                .expect("Failed to hold note");
        }
    }

    /// Move the clock to the next deadline and fire. `None` if the timer is idle.
    pub fn step(&self) -> Option<FireReport> {
        let deadline = self.engine.next_deadline()?;
        self.clock.set(deadline);
        self.engine.poll()
    }

    pub fn steps(&self, count: usize) -> Vec<FireReport> {
        (0..count).map_while(|_| self.step()).collect()
    }

    pub fn drain(&self) -> Vec<TimedArpEvent> {
        self.events.try_iter().collect()
    }
}

/// Notes of every note-on, in emission order.
pub fn played(events: &[TimedArpEvent]) -> Vec<u8> {
    events
        .iter()
        .filter(|e| e.event.is_note_on())
        .filter_map(|e| e.event.note())
        .collect()
}

/// Notes of every note-off, in emission order.
pub fn released(events: &[TimedArpEvent]) -> Vec<u8> {
    events
        .iter()
        .filter(|e| e.event.is_note_off())
        .filter_map(|e| e.event.note())
        .collect()
}

pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

pub fn us(us: u64) -> Duration {
    Duration::from_micros(us)
}
