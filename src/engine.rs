//! Arpeggiator engine controller.

use std::time::Duration;

use crossbeam_channel::Sender;

use arpeggio_core::compat::{Arc, AtomicU64, Mutex, Ordering};
use arpeggio_core::{
    ArpDirection, ArpParams, Clock, EventSink, FireReport, HeldSet, NoteRegistry, ParamStore,
    RotationStart, Scheduler, SchedulerState, TransitionResult,
};
use arpeggio_midi::{MidiEvent, MAX_NOTE, MAX_VELOCITY};

use crate::runner::{RunnerCommand, RunnerHandle};
use crate::{Error, Result};

/// Scheduler and sink share one lock so a firing and a disable can never
/// interleave their note-offs.
pub(crate) struct SchedulerCore {
    pub(crate) scheduler: Scheduler,
    pub(crate) sink: Box<dyn EventSink>,
}

pub(crate) struct EngineShared {
    registry: NoteRegistry,
    params: ParamStore,
    core: Mutex<SchedulerCore>,
    clock: Arc<dyn Clock>,
    clock_pulses: AtomicU64,
    waker: Mutex<Option<Sender<RunnerCommand>>>,
}

/// Arpeggiator engine.
///
/// Cheap to clone; all clones drive the same registry, params and scheduler.
/// Note input and parameter changes are lock-free. Enable, disable and
/// firings serialize on the scheduler lock.
///
/// Timing is host-driven: call [`poll`](Self::poll) at or after
/// [`next_deadline`](Self::next_deadline), or hand the engine to a
/// background thread with [`spawn_runner`](Self::spawn_runner).
///
/// # Example
///
/// ```ignore
/// use arpeggio::prelude::*;
///
/// let (output, mut receiver) = note_output(0)?;
/// let engine = ArpEngine::builder()
///     .tempo(120.0)
///     .clock_division(16)
///     .sink(MidiSink::new(output))
///     .build()?;
///
/// engine.note_on(60, 100)?;
/// engine.note_on(64, 100)?;
/// engine.enable();
///
/// let runner = engine.spawn_runner()?;
/// ```
#[derive(Clone)]
pub struct ArpEngine {
    shared: Arc<EngineShared>,
}

impl ArpEngine {
    pub fn builder() -> crate::ArpEngineBuilder {
        crate::ArpEngineBuilder::default()
    }

    pub(crate) fn from_parts(
        params: ParamStore,
        sink: Box<dyn EventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            shared: Arc::new(EngineShared {
                registry: NoteRegistry::new(),
                params,
                core: Mutex::new(SchedulerCore {
                    scheduler: Scheduler::new(),
                    sink,
                }),
                clock,
                clock_pulses: AtomicU64::new(0),
                waker: Mutex::new(None),
            }),
        }
    }

    // =========================================================================
    // Enable / disable
    // =========================================================================

    /// Enabling arms an immediate firing. Disabling cancels the pending
    /// firing, releases any sounding note and restarts the rotation.
    /// Setting the current state again is a no-op.
    pub fn set_enabled(&self, enabled: bool) -> TransitionResult {
        let now = self.now();
        let result = {
            let mut core = self.shared.core.lock();
            let SchedulerCore { scheduler, sink } = &mut *core;
            if enabled {
                scheduler.enable(now)
            } else {
                scheduler.disable(now, sink.as_mut())
            }
        };
        if result.changed() {
            tracing::info!(
                "Arpeggiator {}",
                if enabled { "enabled" } else { "disabled" }
            );
            self.wake_runner();
        }
        result
    }

    pub fn enable(&self) -> TransitionResult {
        self.set_enabled(true)
    }

    pub fn disable(&self) -> TransitionResult {
        self.set_enabled(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.core.lock().scheduler.is_enabled()
    }

    pub fn state(&self) -> SchedulerState {
        self.shared.core.lock().scheduler.state()
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Takes effect when the next firing reschedules. A pending firing keeps
    /// its deadline. Non-finite or non-positive values are rejected and the
    /// previous tempo stays live.
    pub fn set_tempo(&self, bpm: f64) -> Result<()> {
        self.shared.params.update(|p| p.tempo = bpm)?;
        Ok(())
    }

    /// Same timing rules as [`set_tempo`](Self::set_tempo). Zero is rejected.
    pub fn set_clock_division(&self, division: u32) -> Result<()> {
        self.shared.params.update(|p| p.clock_division = division)?;
        Ok(())
    }

    pub fn set_direction(&self, direction: ArpDirection) -> Result<()> {
        self.shared.params.update(|p| p.direction = direction)?;
        Ok(())
    }

    pub fn set_rotation_start(&self, rotation: RotationStart) -> Result<()> {
        self.shared.params.update(|p| p.rotation = rotation)?;
        Ok(())
    }

    pub fn set_echo_tempo(&self, echo: bool) -> Result<()> {
        self.shared.params.update(|p| p.echo_tempo = echo)?;
        Ok(())
    }

    /// Replace every parameter at once. Validated as a whole.
    pub fn set_params(&self, params: ArpParams) -> Result<()> {
        self.shared.params.update(|p| *p = params.clone())?;
        Ok(())
    }

    pub fn params(&self) -> Arc<ArpParams> {
        self.shared.params.snapshot()
    }

    pub fn tempo(&self) -> f64 {
        self.params().tempo
    }

    pub fn clock_division(&self) -> u32 {
        self.params().clock_division
    }

    // =========================================================================
    // Note input
    // =========================================================================

    /// Raw note input. Velocity 0 releases the note, velocities above 127
    /// are clamped. Notes outside 0..=127 and negative velocities are
    /// rejected without touching the registry.
    pub fn note_event(&self, note: i32, velocity: i32) -> Result<()> {
        if !(0..=MAX_NOTE as i32).contains(&note) {
            tracing::warn!("Ignoring note event for out-of-range note {}", note);
            return Err(arpeggio_core::Error::InvalidNoteNumber(note).into());
        }
        if velocity < 0 {
            tracing::warn!("Ignoring note {} with negative velocity {}", note, velocity);
            return Err(arpeggio_core::Error::InvalidVelocity(velocity).into());
        }
        let velocity = velocity.min(MAX_VELOCITY as i32) as u8;
        self.note_on(note as u8, velocity)
    }

    /// Velocity 0 is a release. Velocities above 127 are clamped.
    pub fn note_on(&self, note: u8, velocity: u8) -> Result<()> {
        self.shared
            .registry
            .set_note(note, velocity.min(MAX_VELOCITY))?;
        Ok(())
    }

    pub fn note_off(&self, note: u8) -> Result<()> {
        self.shared.registry.set_note(note, 0)?;
        Ok(())
    }

    /// Feed a MIDI event into the registry. Returns `false` for messages
    /// that are not note-on or note-off.
    pub fn handle_midi(&self, event: &MidiEvent) -> Result<bool> {
        match (event.note(), event.velocity()) {
            (Some(note), Some(velocity)) if event.is_note_on() => {
                self.note_on(note, velocity)?;
                Ok(true)
            }
            (Some(note), _) if event.is_note_off() => {
                self.note_off(note)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Parse raw MIDI bytes and feed the result through
    /// [`handle_midi`](Self::handle_midi).
    pub fn handle_midi_bytes(&self, bytes: &[u8]) -> Result<bool> {
        let event = MidiEvent::from_bytes(bytes).map_err(Error::Midi)?;
        self.handle_midi(&event)
    }

    /// Release every held note. Returns how many were held.
    pub fn all_notes_off(&self) -> usize {
        self.shared.registry.release_all()
    }

    pub fn held_notes(&self) -> HeldSet {
        self.shared.registry.held_notes()
    }

    pub fn registry(&self) -> &NoteRegistry {
        &self.shared.registry
    }

    // =========================================================================
    // External clock
    // =========================================================================

    /// Count an external clock pulse. Pulses are observed only; timing is
    /// always derived from tempo and clock division.
    pub fn clock_pulse(&self) -> u64 {
        let count = self.shared.clock_pulses.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!("External clock pulse {}", count);
        count
    }

    pub fn clock_pulses(&self) -> u64 {
        self.shared.clock_pulses.load(Ordering::Relaxed)
    }

    // =========================================================================
    // Timing
    // =========================================================================

    /// Fire if the timer is due. Returns what the firing did, or `None`
    /// if nothing was due.
    pub fn poll(&self) -> Option<FireReport> {
        let now = self.now();
        let params = self.shared.params.snapshot();
        let mut core = self.shared.core.lock();
        let SchedulerCore { scheduler, sink } = &mut *core;
        scheduler.poll(now, &self.shared.registry, &params, sink.as_mut())
    }

    /// When the next firing is due, on this engine's clock. `None` while
    /// disabled or after a degenerate interval left the timer idle.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.shared.core.lock().scheduler.next_deadline()
    }

    pub fn now(&self) -> Duration {
        self.shared.clock.now()
    }

    /// Total firings since the engine was built.
    pub fn firings(&self) -> u64 {
        self.shared.core.lock().scheduler.firings()
    }

    /// Run `f` against the event sink under the scheduler lock.
    pub fn with_sink<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut dyn EventSink) -> R,
    {
        let mut core = self.shared.core.lock();
        f(core.sink.as_mut())
    }

    // =========================================================================
    // Runner
    // =========================================================================

    /// Drive this engine from a dedicated thread until the returned handle
    /// is shut down or dropped. Only one runner may be active at a time.
    pub fn spawn_runner(&self) -> Result<RunnerHandle> {
        let mut waker = self.shared.waker.lock();
        if waker.is_some() {
            return Err(Error::RunnerActive);
        }
        let handle = RunnerHandle::spawn(self.clone())?;
        *waker = Some(handle.command_sender());
        Ok(handle)
    }

    pub(crate) fn clear_runner(&self) {
        self.shared.waker.lock().take();
    }

    fn wake_runner(&self) {
        if let Some(tx) = self.shared.waker.lock().as_ref() {
            // A full queue already holds a pending wake.
            let _ = tx.try_send(RunnerCommand::Wake);
        }
    }
}

impl std::fmt::Debug for ArpEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArpEngine")
            .field("params", &self.params())
            .field("state", &self.state())
            .field("held", &self.shared.registry.held_count())
            .finish()
    }
}
