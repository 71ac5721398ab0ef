//! Outbound calls to other services.
//!
//! Whatever goes wrong on the way (connection refused, timeout, open circuit,
//! a body that is not an envelope) comes back as an error envelope; callers
//! never see a transport error.

pub mod address;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::response::ApiResponse;
use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerError};
use crate::config::RemoteServiceConfig;
use crate::contract::Operation;
use crate::errors::{DomainError, ErrorCode};
use crate::metrics::registry::{REMOTE_CALLS_TOTAL, REMOTE_CALL_ERRORS_TOTAL};

/// HTTP client for one remote service, guarded by a circuit breaker
#[derive(Clone)]
pub struct ServiceClient {
    service: String,
    base_url: String,
    http_client: reqwest::Client,
    circuit_breaker: Arc<CircuitBreaker>,
}

impl ServiceClient {
    pub fn new(config: &RemoteServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("catpang/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .context("Failed to build HTTP client")?;

        let circuit_breaker = Arc::new(CircuitBreaker::new(
            config.name.clone(),
            config.circuit_breaker.clone(),
        ));

        debug!(
            service = %config.name,
            base_url = %config.base_url,
            timeout_ms = config.timeout.as_millis() as u64,
            "Initialized service client"
        );

        Ok(Self {
            service: config.name.clone(),
            base_url: config.base_url.clone(),
            http_client,
            circuit_breaker,
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Invoke `operation` with its path parameters filled in
    pub async fn call<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        params: &[(&str, &str)],
    ) -> ApiResponse<T> {
        REMOTE_CALLS_TOTAL
            .with_label_values(&[&self.service, operation.name])
            .inc();

        let url = format!("{}{}", self.base_url, operation.expand(params));
        let envelope = match self.send(operation, &url).await {
            Ok(envelope) => envelope,
            Err(error) => ApiResponse::error(error),
        };

        if let Some(error) = envelope.domain_error() {
            REMOTE_CALL_ERRORS_TOTAL
                .with_label_values(&[&self.service, error.code().name()])
                .inc();
        }

        envelope
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        url: &str,
    ) -> Result<ApiResponse<T>, DomainError> {
        debug!(service = %self.service, operation = operation.name, url = %url, "Calling remote service");

        let request = self
            .http_client
            .request(operation.method.as_method(), url);

        let response = match self.circuit_breaker.call(request.send()).await {
            Ok(response) => response,
            Err(CircuitBreakerError::Open) => {
                return Err(DomainError::with_message(
                    ErrorCode::ServiceUnavailable,
                    format!("{} is temporarily unavailable", self.service),
                ));
            }
            Err(CircuitBreakerError::Inner(e)) => {
                warn!(
                    service = %self.service,
                    operation = operation.name,
                    timeout = e.is_timeout(),
                    error = %e,
                    "Remote call failed"
                );
                return Err(self.remote_failure(if e.is_timeout() {
                    "timed out"
                } else {
                    "failed"
                }));
            }
        };

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            warn!(service = %self.service, error = %e, "Failed to read remote response body");
            self.remote_failure("failed")
        })?;

        serde_json::from_slice::<ApiResponse<T>>(&body).map_err(|e| {
            warn!(
                service = %self.service,
                operation = operation.name,
                status = status.as_u16(),
                error = %e,
                "Remote response is not an envelope"
            );
            self.remote_failure("returned an unreadable response")
        })
    }

    fn remote_failure(&self, what: &str) -> DomainError {
        DomainError::with_message(
            ErrorCode::RemoteServiceError,
            format!("Call to {} {}", self.service, what),
        )
    }
}
