//! Builder for configuring and constructing an `ArpEngine`.

use arpeggio_core::compat::Arc;
use arpeggio_core::{
    ArpDirection, ArpParams, Clock, EventSink, NullSink, ParamStore, RotationStart, SystemClock,
};

use crate::{ArpEngine, Result};

/// Parameters are validated together in [`build`](Self::build); an invalid
/// tempo or clock division fails construction instead of producing an engine
/// that never fires.
///
/// Without a sink, events are discarded. Without a clock, the engine runs on
/// wall time measured from `build()`.
///
/// # Example
///
/// ```ignore
/// use arpeggio::prelude::*;
///
/// let clock = Arc::new(ManualClock::new());
/// let (tx, rx) = crossbeam_channel::unbounded();
///
/// let engine = ArpEngine::builder()
///     .tempo(90.0)
///     .clock_division(4)
///     .direction(ArpDirection::UpDown)
///     .clock(clock.clone())
///     .sink(tx)
///     .enabled(true)
///     .build()?;
/// ```
pub struct ArpEngineBuilder {
    params: ArpParams,
    enabled: bool,
    sink: Option<Box<dyn EventSink>>,
    clock: Option<Arc<dyn Clock>>,
}

impl Default for ArpEngineBuilder {
    fn default() -> Self {
        Self {
            params: ArpParams::default(),
            enabled: false,
            sink: None,
            clock: None,
        }
    }
}

impl ArpEngineBuilder {
    /// Default: 120 BPM
    pub fn tempo(mut self, bpm: f64) -> Self {
        self.params.tempo = bpm;
        self
    }

    /// Default: 16
    pub fn clock_division(mut self, division: u32) -> Self {
        self.params.clock_division = division;
        self
    }

    pub fn direction(mut self, direction: ArpDirection) -> Self {
        self.params.direction = direction;
        self
    }

    pub fn rotation_start(mut self, rotation: RotationStart) -> Self {
        self.params.rotation = rotation;
        self
    }

    pub fn echo_tempo(mut self, echo: bool) -> Self {
        self.params.echo_tempo = echo;
        self
    }

    /// Replace all parameters, e.g. ones loaded from a preset.
    pub fn params(mut self, params: ArpParams) -> Self {
        self.params = params;
        self
    }

    /// Start enabled, with the first firing due immediately.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<ArpEngine> {
        let params = ParamStore::new(self.params)?;
        let sink = self.sink.unwrap_or_else(|| Box::new(NullSink));
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()));

        let engine = ArpEngine::from_parts(params, sink, clock);

        let params = engine.params();
        tracing::info!(
            "Arpeggiator engine built: {} BPM, division {}, {} pattern",
            params.tempo,
            params.clock_division,
            params.direction.name()
        );

        if self.enabled {
            engine.enable();
        }

        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arpeggio_core::{ManualClock, SchedulerState};
    use std::time::Duration;

    #[test]
    fn test_builder_defaults() {
        let engine = ArpEngineBuilder::default().build().unwrap();
        assert_eq!(engine.tempo(), 120.0);
        assert_eq!(engine.clock_division(), 16);
        assert_eq!(engine.state(), SchedulerState::Disabled);
    }

    #[test]
    fn test_builder_rejects_invalid_params() {
        assert!(ArpEngineBuilder::default().tempo(-1.0).build().is_err());
        assert!(ArpEngineBuilder::default()
            .clock_division(0)
            .build()
            .is_err());
    }

    #[test]
    fn test_builder_enabled_arms_at_clock_now() {
        let clock = Arc::new(ManualClock::new());
        clock.set(Duration::from_millis(40));
        let engine = ArpEngineBuilder::default()
            .clock(clock)
            .enabled(true)
            .build()
            .unwrap();
        assert_eq!(engine.state(), SchedulerState::Armed);
        assert_eq!(engine.next_deadline(), Some(Duration::from_millis(40)));
    }
}
