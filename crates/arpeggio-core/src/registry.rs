//! Held-note registry.
//!
//! One atomic velocity slot per MIDI note. Note input threads write slots
//! independently; the scheduler scans them into an ordered snapshot on every
//! firing and never writes.

use arpeggio_midi::MAX_NOTE;
use smallvec::SmallVec;

use crate::compat::{AtomicU8, Ordering};
use crate::{Error, Result};

pub const NOTE_COUNT: usize = MAX_NOTE as usize + 1;

/// A held note and the velocity it was struck with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeldNote {
    pub note: u8,
    pub velocity: u8,
}

impl HeldNote {
    #[inline]
    pub const fn new(note: u8, velocity: u8) -> Self {
        Self { note, velocity }
    }
}

/// Ordered snapshot of held notes, ascending by note number.
///
/// Inline capacity covers ten-finger chords without touching the allocator.
pub type HeldSet = SmallVec<[HeldNote; 16]>;

pub struct NoteRegistry {
    velocities: [AtomicU8; NOTE_COUNT],
}

impl NoteRegistry {
    pub fn new() -> Self {
        Self {
            velocities: std::array::from_fn(|_| AtomicU8::new(0)),
        }
    }

    /// Velocity 0 releases the note; anything else holds it.
    pub fn set_note(&self, note: u8, velocity: u8) -> Result<()> {
        if note > MAX_NOTE {
            tracing::warn!("Rejected note {} (velocity {}): out of range", note, velocity);
            return Err(Error::InvalidNoteNumber(note as i32));
        }
        self.velocities[note as usize].store(velocity, Ordering::Release);
        Ok(())
    }

    /// 0 for released or out-of-range notes.
    #[inline]
    pub fn velocity(&self, note: u8) -> u8 {
        self.velocities
            .get(note as usize)
            .map_or(0, |v| v.load(Ordering::Acquire))
    }

    #[inline]
    pub fn is_held(&self, note: u8) -> bool {
        self.velocity(note) > 0
    }

    pub fn held_notes(&self) -> HeldSet {
        self.velocities
            .iter()
            .enumerate()
            .filter_map(|(note, slot)| {
                let velocity = slot.load(Ordering::Acquire);
                (velocity > 0).then(|| HeldNote::new(note as u8, velocity))
            })
            .collect()
    }

    pub fn held_count(&self) -> usize {
        self.velocities
            .iter()
            .filter(|slot| slot.load(Ordering::Acquire) > 0)
            .count()
    }

    /// Release every note. Returns how many were held.
    pub fn release_all(&self) -> usize {
        self.velocities
            .iter()
            .filter(|slot| slot.swap(0, Ordering::AcqRel) > 0)
            .count()
    }
}

impl Default for NoteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for NoteRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NoteRegistry")
            .field("held", &self.held_notes())
            .finish()
    }
}
