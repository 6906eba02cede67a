//! Tempo to step-interval conversion.

use std::time::Duration;

use crate::{Error, Result};

pub const MS_PER_MINUTE: f64 = 60_000.0;

/// Milliseconds between pulses at `tempo` BPM with `clock_division` pulses per beat.
///
/// Not validated: zero or negative inputs produce infinite, negative or NaN
/// results. Use [`StepInterval::new`] for a checked value.
#[inline]
pub fn interval_ms(tempo: f64, clock_division: u32) -> f64 {
    MS_PER_MINUTE / (tempo * clock_division as f64)
}

/// A positive, finite pulse interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepInterval {
    ms: f64,
    duration: Duration,
}

impl StepInterval {
    pub fn new(tempo: f64, clock_division: u32) -> Result<Self> {
        let ms = interval_ms(tempo, clock_division);
        if !(ms.is_finite() && ms > 0.0) {
            return Err(Error::DegenerateInterval(ms));
        }
        let duration =
            Duration::try_from_secs_f64(ms / 1000.0).map_err(|_| Error::DegenerateInterval(ms))?;
        if duration.is_zero() {
            return Err(Error::DegenerateInterval(ms));
        }
        Ok(Self { ms, duration })
    }

    #[inline]
    pub fn as_millis_f64(&self) -> f64 {
        self.ms
    }

    #[inline]
    pub fn as_duration(&self) -> Duration {
        self.duration
    }
}
