//! Circuit breaker guarding outbound calls to other services

mod state;

use anyhow::{ensure, Context, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::metrics::registry::CIRCUIT_BREAKER_STATE;

pub use state::{CircuitState, CircuitStateData};

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit
    pub failure_threshold: u32,
    /// Successful trial calls needed to close it again
    pub success_threshold: u32,
    /// How long the circuit stays open before trying again
    pub timeout: Duration,
    /// Trial calls admitted per half-open phase
    pub half_open_max_requests: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 2,
            timeout: Duration::from_secs(60),
            half_open_max_requests: 3,
        }
    }
}

impl CircuitBreakerConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let read = |key: &str, default: u32| -> Result<u32> {
            match std::env::var(key) {
                Ok(value) => value
                    .parse()
                    .with_context(|| format!("{} must be a valid number", key)),
                Err(_) => Ok(default),
            }
        };

        let config = Self {
            failure_threshold: read(
                "CIRCUIT_BREAKER_FAILURE_THRESHOLD",
                defaults.failure_threshold,
            )?,
            success_threshold: read(
                "CIRCUIT_BREAKER_SUCCESS_THRESHOLD",
                defaults.success_threshold,
            )?,
            timeout: Duration::from_secs(u64::from(read(
                "CIRCUIT_BREAKER_TIMEOUT_SECONDS",
                defaults.timeout.as_secs() as u32,
            )?)),
            half_open_max_requests: read(
                "CIRCUIT_BREAKER_HALF_OPEN_REQUESTS",
                defaults.half_open_max_requests,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings under which the breaker could never close again
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.failure_threshold >= 1,
            "CIRCUIT_BREAKER_FAILURE_THRESHOLD must be at least 1"
        );
        ensure!(
            self.half_open_max_requests >= 1,
            "CIRCUIT_BREAKER_HALF_OPEN_REQUESTS must be at least 1"
        );
        ensure!(
            (1..=self.half_open_max_requests).contains(&self.success_threshold),
            "CIRCUIT_BREAKER_SUCCESS_THRESHOLD must be between 1 and CIRCUIT_BREAKER_HALF_OPEN_REQUESTS ({})",
            self.half_open_max_requests
        );
        Ok(())
    }
}

#[derive(Debug)]
pub enum CircuitBreakerError<E> {
    /// The call was not attempted
    Open,
    Inner(E),
}

impl<E: std::fmt::Display> std::fmt::Display for CircuitBreakerError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitBreakerError::Open => write!(f, "Circuit breaker is open"),
            CircuitBreakerError::Inner(e) => write!(f, "{}", e),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for CircuitBreakerError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CircuitBreakerError::Open => None,
            CircuitBreakerError::Inner(e) => Some(e),
        }
    }
}

/// One breaker per remote service; clones share state
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    state: Arc<Mutex<CircuitStateData>>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let name = name.into();
        info!(
            name = %name,
            failure_threshold = config.failure_threshold,
            success_threshold = config.success_threshold,
            timeout_secs = config.timeout.as_secs(),
            "Initialized circuit breaker"
        );
        CIRCUIT_BREAKER_STATE
            .with_label_values(&[&name])
            .set(CircuitState::Closed.as_metric_value());

        Self {
            name,
            config,
            state: Arc::new(Mutex::new(CircuitStateData::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn state(&self) -> CircuitState {
        let mut data = self.state.lock().await;
        self.refresh(&mut data);
        data.state
    }

    /// Run `f` unless the circuit is open
    pub async fn call<F, T, E>(&self, f: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        if !self.admit().await {
            return Err(CircuitBreakerError::Open);
        }

        match f.await {
            Ok(value) => {
                self.record_success().await;
                Ok(value)
            }
            Err(error) => {
                self.record_failure().await;
                Err(CircuitBreakerError::Inner(error))
            }
        }
    }

    /// Decide whether a call may proceed
    async fn admit(&self) -> bool {
        let mut data = self.state.lock().await;
        self.refresh(&mut data);

        match data.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                warn!(name = %self.name, "Circuit breaker open, rejecting call");
                false
            }
            CircuitState::HalfOpen => {
                if data.trials_admitted >= self.config.half_open_max_requests {
                    warn!(name = %self.name, "Circuit breaker half-open trial limit reached");
                    return false;
                }
                data.trials_admitted += 1;
                true
            }
        }
    }

    async fn record_success(&self) {
        let mut data = self.state.lock().await;
        match data.state {
            CircuitState::Closed => data.consecutive_failures = 0,
            CircuitState::HalfOpen => {
                data.trial_successes += 1;
                if data.trial_successes >= self.config.success_threshold {
                    info!(name = %self.name, "Circuit breaker closing after successful trial calls");
                    self.transition(&mut data, CircuitState::Closed);
                }
            }
            CircuitState::Open => {}
        }
    }

    async fn record_failure(&self) {
        let mut data = self.state.lock().await;
        match data.state {
            CircuitState::Closed => {
                data.consecutive_failures += 1;
                if data.consecutive_failures >= self.config.failure_threshold {
                    warn!(
                        name = %self.name,
                        failures = data.consecutive_failures,
                        "Circuit breaker opening due to failures"
                    );
                    self.transition(&mut data, CircuitState::Open);
                }
            }
            CircuitState::HalfOpen => {
                warn!(name = %self.name, "Circuit breaker reopening after failed trial call");
                self.transition(&mut data, CircuitState::Open);
            }
            CircuitState::Open => {}
        }
    }

    fn refresh(&self, data: &mut CircuitStateData) {
        if data.cooldown_elapsed(self.config.timeout) {
            info!(name = %self.name, "Circuit breaker transitioning to half-open");
            self.transition(data, CircuitState::HalfOpen);
        } else if data.trial_window_expired(self.config.timeout) {
            warn!(
                name = %self.name,
                trials_admitted = data.trials_admitted,
                trial_successes = data.trial_successes,
                "Half-open trial calls did not settle, starting a new window"
            );
            self.transition(data, CircuitState::HalfOpen);
        }
    }

    fn transition(&self, data: &mut CircuitStateData, next: CircuitState) {
        data.enter(next);
        CIRCUIT_BREAKER_STATE
            .with_label_values(&[&self.name])
            .set(next.as_metric_value());
    }
}
