//! Logging middleware
//!
//! Records HTTP request and response information

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// Searches that take longer than this are flagged
const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(10);

/// Header echoing the request id back to the caller
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request logging middleware
///
/// Wraps each request in a span carrying a fresh request id
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %uri.path(),
    );

    async move {
        info!(
            "Request started: {} {} - client: {}",
            method,
            uri,
            get_client_ip(request.headers()).unwrap_or_else(|| "unknown".to_string())
        );

        let mut response = next.run(request).await;

        let duration = start_time.elapsed();
        let status = response.status();
        let millis = duration.as_secs_f64() * 1000.0;

        if status.is_server_error() {
            warn!("Server error: {} - Duration: {:.2}ms", status, millis);
        } else if status.is_client_error() {
            warn!("Client error: {} - Duration: {:.2}ms", status, millis);
        } else {
            info!("Request completed: {} - Duration: {:.2}ms", status, millis);
        }

        if duration > SLOW_REQUEST_THRESHOLD {
            warn!("Slow request: {} {} took {:.2}s", method, uri, duration.as_secs_f64());
        }

        if let Ok(value) = request_id.parse() {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        response
    }
    .instrument(span)
    .await
}

/// Get client IP address from proxy headers
fn get_client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get(header::FORWARDED)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.split(';')
                .find_map(|part| part.trim().strip_prefix("for="))
                .map(|ip| ip.trim_matches('"').to_string())
        });

    forwarded.or_else(|| {
        ["x-forwarded-for", "x-real-ip"].iter().find_map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|ip| !ip.is_empty() && *ip != "unknown")
                .map(str::to_string)
        })
    })
}
