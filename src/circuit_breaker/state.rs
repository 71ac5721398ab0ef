use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    /// Value published on the `circuit_breaker_state` gauge
    pub fn as_metric_value(&self) -> i64 {
        match self {
            CircuitState::Closed => 0,
            CircuitState::Open => 1,
            CircuitState::HalfOpen => 2,
        }
    }
}

/// Mutable bookkeeping behind the breaker's lock
#[derive(Debug)]
pub struct CircuitStateData {
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub trial_successes: u32,
    pub trials_admitted: u32,
    /// When the current state was entered
    pub entered_at: Instant,
}

impl CircuitStateData {
    pub fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            trial_successes: 0,
            trials_admitted: 0,
            entered_at: Instant::now(),
        }
    }

    /// Move to `state` and forget counters from the previous phase
    pub fn enter(&mut self, state: CircuitState) {
        self.state = state;
        self.consecutive_failures = 0;
        self.trial_successes = 0;
        self.trials_admitted = 0;
        self.entered_at = Instant::now();
    }

    /// Open long enough that a trial call may go through
    pub fn cooldown_elapsed(&self, cooldown: Duration) -> bool {
        self.state == CircuitState::Open && self.entered_at.elapsed() >= cooldown
    }

    /// Half-open for a whole cooldown without reaching a verdict, e.g. because
    /// admitted trial calls were cancelled before reporting back
    pub fn trial_window_expired(&self, cooldown: Duration) -> bool {
        self.state == CircuitState::HalfOpen && self.entered_at.elapsed() >= cooldown
    }
}

impl Default for CircuitStateData {
    fn default() -> Self {
        Self::new()
    }
}
