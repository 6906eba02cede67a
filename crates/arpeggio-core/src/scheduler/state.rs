//! Scheduler state machine.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Disabled,
    /// Enabled, first firing pending at zero delay.
    Armed,
    /// Enabled, recurring firings.
    Running,
}

impl SchedulerState {
    #[inline]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, SchedulerState::Disabled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerEvent {
    Enable,
    Disable,
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    None,
    StateChanged(SchedulerState),
}

impl TransitionResult {
    #[inline]
    pub fn changed(&self) -> bool {
        !matches!(self, TransitionResult::None)
    }
}

#[derive(Debug, Default)]
pub struct SchedulerFsm {
    state: SchedulerState,
}

impl SchedulerFsm {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn transition(&mut self, event: SchedulerEvent) -> TransitionResult {
        use SchedulerEvent::*;

        let next = match (event, self.state) {
            (Enable, SchedulerState::Disabled) => SchedulerState::Armed,
            (Enable, _) => return TransitionResult::None,

            (Disable, SchedulerState::Disabled) => return TransitionResult::None,
            (Disable, _) => SchedulerState::Disabled,

            (Fire, SchedulerState::Armed) => SchedulerState::Running,
            (Fire, _) => return TransitionResult::None,
        };

        self.state = next;
        TransitionResult::StateChanged(next)
    }
}
