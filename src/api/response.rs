use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::DomainError;
use crate::metrics::registry::DOMAIN_ERRORS_TOTAL;

/// Envelope returned by every endpoint, local or remote.
///
/// On the wire:
/// - `{"status":"success","data":...}`
/// - `{"status":"error","error":{"code":"...","message":"..."}}`
///
/// The enum makes a half-filled envelope unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApiResponse<T> {
    Success { data: T },
    Error { error: DomainError },
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub fn error(error: impl Into<DomainError>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }

    pub fn from_result(result: Result<T, DomainError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(error) => Self::error(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Error { .. } => None,
        }
    }

    pub fn domain_error(&self) -> Option<&DomainError> {
        match self {
            Self::Success { .. } => None,
            Self::Error { error } => Some(error),
        }
    }

    /// Unwrap into a `Result` so callers can use `?` on a remote answer
    pub fn into_result(self) -> Result<T, DomainError> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Error { error } => Err(error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        match self {
            Self::Success { data } => ApiResponse::Success { data: f(data) },
            Self::Error { error } => ApiResponse::Error { error },
        }
    }

    /// HTTP status this envelope is sent with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Success { .. } => StatusCode::OK,
            Self::Error { error } => StatusCode::from_u16(error.code().status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl<T> From<Result<T, DomainError>> for ApiResponse<T> {
    fn from(result: Result<T, DomainError>) -> Self {
        Self::from_result(result)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let Self::Error { error } = &self {
            let code = error.code();
            DOMAIN_ERRORS_TOTAL.with_label_values(&[code.name()]).inc();
            if code.is_client_error() {
                debug!(code = %code, message = %error, "Returning error envelope");
            } else {
                warn!(code = %code, message = %error, "Returning error envelope");
            }
        }

        (status, Json(self)).into_response()
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::error(self).into_response()
    }
}
