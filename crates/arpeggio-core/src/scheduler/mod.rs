//! Arpeggiator scheduler.
//!
//! Owns the enable state, the timer slot, the rotation cursor and the set of
//! notes the engine itself has sounded. Each firing:
//!
//! 1. computes the step interval from one params snapshot,
//! 2. releases every note the previous firing sounded,
//! 3. snapshots the held notes and asks the sequencer for the next one,
//! 4. sounds it (note-on, then a tick),
//! 5. re-arms the timer one interval later.
//!
//! A note therefore never stays on for longer than one interval, whatever
//! happens to the held notes in between. Params are validated before they
//! reach the scheduler; if a degenerate interval gets through anyway, the
//! firing only releases and the timer is left idle, so nothing is left
//! sounding without a following firing to turn it off.

mod state;
mod timer;

pub use state::{SchedulerEvent, SchedulerFsm, SchedulerState, TransitionResult};
pub use timer::TimerSlot;

use std::time::Duration;

use smallvec::SmallVec;

use crate::config::ArpParams;
use crate::event::{ArpEvent, EventSink};
use crate::interval::StepInterval;
use crate::pattern::PatternSequencer;
use crate::registry::{HeldNote, NoteRegistry};

/// What a single firing did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireReport {
    pub at: Duration,
    /// `None` for a rest.
    pub played: Option<HeldNote>,
    /// Note-offs emitted for the previous firing's notes.
    pub released: usize,
    /// `None` if the interval was degenerate and the timer was left idle.
    pub next_deadline: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    fsm: SchedulerFsm,
    timer: TimerSlot,
    sequencer: PatternSequencer,
    sounding: SmallVec<[u8; 4]>,
    firings: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> SchedulerState {
        self.fsm.state()
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.fsm.state().is_enabled()
    }

    #[inline]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.sequencer.cursor()
    }

    /// Notes sounded by the last firing and not yet released.
    #[inline]
    pub fn sounding(&self) -> &[u8] {
        &self.sounding
    }

    #[inline]
    pub fn firings(&self) -> u64 {
        self.firings
    }

    /// Arm an immediate firing. No-op if already enabled.
    pub fn enable(&mut self, now: Duration) -> TransitionResult {
        let result = self.fsm.transition(SchedulerEvent::Enable);
        if result.changed() {
            self.timer.schedule_at(now);
            tracing::debug!("Arpeggiator armed at {:?}", now);
        }
        result
    }

    /// Cancel the pending firing, release sounding notes and reset rotation.
    /// No-op if already disabled.
    pub fn disable(&mut self, now: Duration, sink: &mut dyn EventSink) -> TransitionResult {
        let result = self.fsm.transition(SchedulerEvent::Disable);
        if result.changed() {
            self.timer.cancel();
            let released = self.release_sounding(now, sink);
            self.sequencer.reset();
            tracing::debug!("Arpeggiator disabled, released {} note(s)", released);
        }
        result
    }

    /// Fire if the timer is due at `now`.
    pub fn poll(
        &mut self,
        now: Duration,
        registry: &NoteRegistry,
        params: &ArpParams,
        sink: &mut dyn EventSink,
    ) -> Option<FireReport> {
        if !self.timer.is_due(now) {
            return None;
        }
        Some(self.fire(now, registry, params, sink))
    }

    fn fire(
        &mut self,
        now: Duration,
        registry: &NoteRegistry,
        params: &ArpParams,
        sink: &mut dyn EventSink,
    ) -> FireReport {
        let interval = match StepInterval::new(params.tempo, params.clock_division) {
            Ok(interval) => Some(interval),
            Err(e) => {
                tracing::warn!("{}; arpeggiator timer will not be rescheduled", e);
                None
            }
        };

        self.fsm.transition(SchedulerEvent::Fire);

        let released = self.release_sounding(now, sink);

        let held = registry.held_notes();
        let played = match interval {
            Some(_) => self
                .sequencer
                .next(&held, params.direction, params.rotation),
            None => None,
        };

        if let Some(note) = played {
            sink.emit(
                now,
                ArpEvent::NoteOn {
                    note: note.note,
                    velocity: note.velocity,
                },
            );
            self.sounding.push(note.note);
            sink.emit(now, ArpEvent::Tick);
            if params.echo_tempo {
                sink.emit(now, ArpEvent::TempoEcho(params.tempo));
            }
        }

        match interval {
            Some(interval) => self.timer.schedule_after(now, interval.as_duration()),
            None => self.timer.cancel(),
        }
        self.firings += 1;

        tracing::trace!(
            "Firing {} at {:?}: played {:?} from {} held, released {}",
            self.firings,
            now,
            played.map(|n| n.note),
            held.len(),
            released
        );

        FireReport {
            at: now,
            played,
            released,
            next_deadline: self.timer.deadline(),
        }
    }

    fn release_sounding(&mut self, now: Duration, sink: &mut dyn EventSink) -> usize {
        let released = self.sounding.len();
        for note in self.sounding.drain(..) {
            sink.emit(now, ArpEvent::NoteOff { note });
        }
        released
    }
}
