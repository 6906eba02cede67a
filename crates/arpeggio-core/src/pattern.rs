//! Note selection and rotation.
//!
//! [`advance`] is the reference rotation: the cursor moves *before* the read,
//! so after a reset the first note played is `held[1 % n]`, not `held[0]`.
//! [`PatternSequencer`] keeps the cursor between firings and layers the
//! direction and rotation-start policies on top.

use serde::{Deserialize, Serialize};

use crate::registry::HeldNote;

/// Advance `cursor` over `held` and pick the note under the new position.
///
/// An empty set is a rest: the cursor resets to 0 so a stale index can never
/// be read once notes come back.
#[inline]
pub fn advance(held: &[HeldNote], cursor: usize) -> (usize, Option<HeldNote>) {
    if held.is_empty() {
        return (0, None);
    }
    let next = (cursor % held.len() + 1) % held.len();
    (next, Some(held[next]))
}

/// Order in which held notes are walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArpDirection {
    /// Ascending note order, wrapping to the lowest note.
    #[default]
    Up,
    /// Descending note order, wrapping to the highest note.
    Down,
    /// Ascending then descending, without repeating the turnaround notes.
    UpDown,
}

impl ArpDirection {
    pub fn name(&self) -> &'static str {
        match self {
            ArpDirection::Up => "Up",
            ArpDirection::Down => "Down",
            ArpDirection::UpDown => "Up/Down",
        }
    }
}

/// Where the first firing after a reset lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationStart {
    /// Move then read, even on the first firing. Up plays `held[1 % n]` first.
    #[default]
    PreIncrement,
    /// The first firing reads the start of the walk (lowest note for Up and
    /// UpDown, highest for Down); later firings rotate as usual.
    FromFirst,
}

#[derive(Debug, Clone)]
pub struct PatternSequencer {
    cursor: usize,
    ascending: bool,
    started: bool,
}

impl PatternSequencer {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            ascending: true,
            started: false,
        }
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.ascending = true;
        self.started = false;
    }

    /// Select the next note. `None` means rest; the sequencer is reset.
    pub fn next(
        &mut self,
        held: &[HeldNote],
        direction: ArpDirection,
        rotation: RotationStart,
    ) -> Option<HeldNote> {
        let len = held.len();
        if len == 0 {
            self.reset();
            return None;
        }

        let from_first = rotation == RotationStart::FromFirst && !self.started;
        self.started = true;

        self.cursor = match direction {
            ArpDirection::Up if from_first => 0,
            ArpDirection::Up => advance(held, self.cursor).0,
            ArpDirection::Down if from_first => len - 1,
            ArpDirection::Down => match self.cursor.min(len) {
                0 => len - 1,
                cur => cur - 1,
            },
            ArpDirection::UpDown if from_first => {
                self.ascending = true;
                0
            }
            ArpDirection::UpDown => self.bounce(len),
        };

        Some(held[self.cursor])
    }

    fn bounce(&mut self, len: usize) -> usize {
        if len == 1 {
            self.ascending = true;
            return 0;
        }
        let cur = self.cursor.min(len - 1);
        if self.ascending {
            if cur + 1 >= len {
                self.ascending = false;
                cur - 1
            } else {
                cur + 1
            }
        } else if cur == 0 {
            self.ascending = true;
            1
        } else {
            cur - 1
        }
    }
}

impl Default for PatternSequencer {
    fn default() -> Self {
        Self::new()
    }
}
