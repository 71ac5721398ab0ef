use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::extract::USER_ID_HEADER;

/// Tags one request in this service's logs and is echoed on the response.
///
/// Reused when the caller sent one, generated otherwise. It is not forwarded
/// on calls to other services.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs every request and its outcome, and echoes the request id back
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = sanitize_query(request.uri().query().unwrap_or(""));
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        query = %query,
        user_id = %user_id,
        "Incoming request"
    );

    let mut response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    if status.is_server_error() {
        error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            "Request failed (server error)"
        );
    } else if status.is_client_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            "Request failed (client error)"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            "Request completed"
        );
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

/// Mask values of parameters that look like credentials
fn sanitize_query(query: &str) -> String {
    const SENSITIVE: [&str; 4] = ["api_key", "token", "password", "secret"];

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if SENSITIVE.contains(&key.to_ascii_lowercase().as_str()) => {
                format!("{}=***", key)
            }
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::Service;

    async fn request_id_of(request: axum::http::Request<Body>) -> String {
        let mut app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn(logging_middleware));
        let response = app.call(request).await.unwrap();
        response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_request_id_is_echoed_or_generated() {
        let supplied = axum::http::Request::builder()
            .uri("/ping")
            .header(REQUEST_ID_HEADER, "req-42")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id_of(supplied).await, "req-42");

        let bare = axum::http::Request::builder()
            .uri("/ping")
            .body(Body::empty())
            .unwrap();
        let generated = request_id_of(bare).await;
        assert!(Uuid::parse_str(&generated).is_ok());
    }

    #[test]
    fn test_sanitize_query() {
        assert_eq!(sanitize_query(""), "");
        assert_eq!(sanitize_query("zip_code=06234"), "zip_code=06234");
        assert_eq!(sanitize_query("token=abc"), "token=***");
        assert_eq!(
            sanitize_query("page=2&Password=hunter2&page_size=10"),
            "page=2&Password=***&page_size=10"
        );
    }
}
