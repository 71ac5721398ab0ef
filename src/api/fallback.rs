//! Responses for requests no handler answered normally.

use axum::{
    extract::Request,
    http::{header::{ALLOW, CONTENT_TYPE}, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};

use std::any::Any;
use tracing::error;

use crate::errors::{DomainError, ErrorCode};

/// Unknown route
pub async fn not_found(uri: Uri) -> DomainError {
    DomainError::not_found(format!("No route for {}", uri.path()))
}

/// Replace the router's empty 405 with an error envelope, keeping `Allow`
pub async fn method_not_allowed(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED
        || response.headers().contains_key(CONTENT_TYPE)
    {
        return response;
    }

    let mut envelope = DomainError::new(ErrorCode::MethodNotAllowed).into_response();
    if let Some(allow) = response.headers().get(ALLOW) {
        envelope.headers_mut().insert(ALLOW, allow.clone());
    }
    envelope
}

/// A panicking handler answers with the generic error envelope
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Handler panicked");

    DomainError::internal().into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_becomes_internal_error() {
        let response = handle_panic(Box::new("index out of bounds"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
