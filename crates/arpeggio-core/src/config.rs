//! Arpeggiator parameters and their lock-free snapshot store.

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::compat::Arc;
use crate::interval::StepInterval;
use crate::pattern::{ArpDirection, RotationStart};
use crate::{Error, Result};

pub const DEFAULT_TEMPO: f64 = 120.0;
pub const DEFAULT_CLOCK_DIVISION: u32 = 16;

/// Live arpeggiator configuration.
///
/// Published as an immutable snapshot. A firing reads exactly one, so tempo
/// and clock division are always seen as a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArpParams {
    /// Beats per minute.
    pub tempo: f64,
    /// Pulses per beat.
    pub clock_division: u32,
    pub direction: ArpDirection,
    pub rotation: RotationStart,
    /// Emit a `TempoEcho` with every sounding firing.
    pub echo_tempo: bool,
}

impl Default for ArpParams {
    fn default() -> Self {
        Self {
            tempo: DEFAULT_TEMPO,
            clock_division: DEFAULT_CLOCK_DIVISION,
            direction: ArpDirection::default(),
            rotation: RotationStart::default(),
            echo_tempo: false,
        }
    }
}

impl ArpParams {
    /// Each field on its own, then the pair: tempo and division must give a
    /// step the scheduler can represent.
    pub fn validate(&self) -> Result<()> {
        validate_tempo(self.tempo)?;
        validate_clock_division(self.clock_division)?;
        StepInterval::new(self.tempo, self.clock_division).map_err(|e| {
            Error::invalid_param(
                "interval",
                format!(
                    "{} BPM at division {} cannot be scheduled: {}",
                    self.tempo, self.clock_division, e
                ),
            )
        })?;
        Ok(())
    }
}

pub fn validate_tempo(bpm: f64) -> Result<()> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(Error::invalid_param(
            "tempo",
            format!("{} BPM, must be a finite value above 0", bpm),
        ));
    }
    Ok(())
}

pub fn validate_clock_division(division: u32) -> Result<()> {
    if division == 0 {
        return Err(Error::invalid_param(
            "clock_division",
            "must be at least 1 pulse per beat",
        ));
    }
    Ok(())
}

/// Writers validate and swap in a whole new [`ArpParams`]; readers load a
/// snapshot without locking.
#[derive(Debug)]
pub struct ParamStore {
    params: ArcSwap<ArpParams>,
}

impl ParamStore {
    pub fn new(params: ArpParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params: ArcSwap::from_pointee(params),
        })
    }

    #[inline]
    pub fn snapshot(&self) -> Arc<ArpParams> {
        self.params.load_full()
    }

    /// Apply `f` to a copy of the current params and publish it if it still
    /// validates. On error the previous params stay live.
    pub fn update(&self, f: impl Fn(&mut ArpParams)) -> Result<Arc<ArpParams>> {
        let mut rejected = None;
        let previous = self.params.rcu(|current| {
            let mut next = ArpParams::clone(current);
            f(&mut next);
            match next.validate() {
                Ok(()) => {
                    rejected = None;
                    Arc::new(next)
                }
                Err(e) => {
                    rejected = Some(e);
                    Arc::clone(current)
                }
            }
        });
        match rejected {
            Some(e) => {
                tracing::warn!("Rejected parameter update: {}", e);
                Err(e)
            }
            None => {
                let current = self.snapshot();
                tracing::debug!(
                    "Params updated: tempo {} -> {}, division {} -> {}",
                    previous.tempo,
                    current.tempo,
                    previous.clock_division,
                    current.clock_division
                );
                Ok(current)
            }
        }
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self {
            params: ArcSwap::from_pointee(ArpParams::default()),
        }
    }
}
