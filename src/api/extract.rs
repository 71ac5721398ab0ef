//! Extractors whose rejections are error envelopes instead of plain text.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::request::Parts,
};

use crate::errors::{parse_user_id, DomainError, ErrorCode};
use crate::models::Requester;

/// Header carrying the authenticated caller's numeric user id
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(DomainError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(DomainError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(DomainError))]
pub struct ApiJson<T>(pub T);

impl From<PathRejection> for DomainError {
    fn from(rejection: PathRejection) -> Self {
        DomainError::with_message(ErrorCode::InvalidTypeValue, rejection.body_text())
    }
}

impl From<QueryRejection> for DomainError {
    fn from(rejection: QueryRejection) -> Self {
        DomainError::with_message(ErrorCode::InvalidTypeValue, rejection.body_text())
    }
}

impl From<JsonRejection> for DomainError {
    fn from(rejection: JsonRejection) -> Self {
        DomainError::with_message(ErrorCode::InvalidInputValue, rejection.body_text())
    }
}

/// Identifies the caller by the `X-User-Id` header
#[async_trait]
impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts.headers.get(USER_ID_HEADER).ok_or_else(|| {
            DomainError::with_message(ErrorCode::Unauthorized, "Missing X-User-Id header")
        })?;

        let raw = value
            .to_str()
            .map_err(|_| DomainError::invalid_id_format(String::from_utf8_lossy(value.as_bytes())))?;

        Ok(Self::new(parse_user_id(raw)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<Requester, DomainError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Requester::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_requester_from_header() {
        let requester = tokio_test::assert_ok!(extract(Some("17")).await);
        assert_eq!(requester.user_id, 17);
    }

    #[tokio::test]
    async fn test_requester_missing_header() {
        let err = tokio_test::assert_err!(extract(None).await);
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "Missing X-User-Id header");
    }

    #[tokio::test]
    async fn test_requester_non_numeric_header() {
        let err = tokio_test::assert_err!(extract(Some("abc123")).await);
        assert_eq!(err, DomainError::invalid_id_format("abc123"));
    }
}
