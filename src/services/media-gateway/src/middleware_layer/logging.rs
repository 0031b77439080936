//! Request logging middleware

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs one line per request with method, path, status and latency, and tags
/// the response with a request id
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // Matched route keeps the log grouping stable
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched_path| matched_path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let span = tracing::info_span!(
        "http_request",
        method = %method,
        path = %path,
        request_id = %request_id,
    );

    let mut response = next.run(request).instrument(span).await;

    let duration_ms = start_time.elapsed().as_millis();
    let status = response.status();

    match status {
        status if status.is_server_error() => error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration_ms,
            request_id = %request_id,
            "Request completed with server error"
        ),
        status if status.is_client_error() => warn!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration_ms,
            request_id = %request_id,
            "Request completed with client error"
        ),
        _ => info!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration_ms,
            request_id = %request_id,
            "Request completed"
        ),
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
