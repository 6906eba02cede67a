//! Note output queue between the arpeggiator and the host.
//!
//! The firing side stamps each note with its firing time and the output
//! channel, then pushes without blocking; a full queue drops the note and
//! counts it. The host pulls notes on its own thread, either everything at
//! once or only those due by a given time (e.g. the end of an audio block).

use std::time::Duration;

use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};

use crate::event::MidiEvent;
use crate::{Error, Result, MAX_CHANNEL};

/// Several seconds of sixteenths even at extreme tempos.
pub const DEFAULT_CAPACITY: usize = 256;

/// Firing side of the queue.
pub struct NoteOutput {
    queue: HeapProd<MidiEvent>,
    channel: u8,
    dropped: u64,
}

impl NoteOutput {
    /// Returns false if the queue was full and the note was dropped.
    #[inline]
    pub fn note_on(&mut self, at: Duration, note: u8, velocity: u8) -> bool {
        self.enqueue(MidiEvent::note_on(at, self.channel, note, velocity))
    }

    /// Returns false if the queue was full and the note was dropped.
    #[inline]
    pub fn note_off(&mut self, at: Duration, note: u8) -> bool {
        self.enqueue(MidiEvent::note_off(at, self.channel, note))
    }

    #[inline]
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Notes lost to a full queue since creation.
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn enqueue(&mut self, event: MidiEvent) -> bool {
        if self.queue.try_push(event).is_ok() {
            return true;
        }
        self.dropped += 1;
        false
    }
}

/// Host side of the queue. Notes come out in firing order, so timestamps
/// never decrease.
pub struct NoteReceiver {
    queue: HeapCons<MidiEvent>,
}

impl NoteReceiver {
    #[inline]
    pub fn pop(&mut self) -> Option<MidiEvent> {
        self.queue.try_pop()
    }

    pub fn drain_all(&mut self) -> Vec<MidiEvent> {
        self.queue.pop_iter().collect()
    }

    /// Pop every note stamped at or before `until`, leaving later ones queued.
    pub fn drain_due(&mut self, until: Duration) -> Vec<MidiEvent> {
        let due = self
            .queue
            .iter()
            .take_while(|event| event.timestamp <= until)
            .count();
        let mut events = Vec::with_capacity(due);
        for _ in 0..due {
            match self.queue.try_pop() {
                Some(event) => events.push(event),
                None => break,
            }
        }
        events
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.queue.occupied_len()
    }
}

/// Queue for notes on `channel` (0..=15) with the default capacity.
pub fn note_output(channel: u8) -> Result<(NoteOutput, NoteReceiver)> {
    note_output_with_capacity(channel, DEFAULT_CAPACITY)
}

pub fn note_output_with_capacity(
    channel: u8,
    capacity: usize,
) -> Result<(NoteOutput, NoteReceiver)> {
    if channel > MAX_CHANNEL {
        return Err(Error::InvalidChannel(channel));
    }
    if capacity == 0 {
        return Err(Error::ZeroCapacity);
    }
    let (queue, receiver) = HeapRb::new(capacity).split();
    Ok((
        NoteOutput {
            queue,
            channel,
            dropped: 0,
        },
        NoteReceiver { queue: receiver },
    ))
}
