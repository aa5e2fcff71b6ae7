//! Request tracing helpers.
//!
//! Every request gets a correlation id: the caller's `X-Request-ID` header
//! when present, otherwise a fresh UUID v7 (time-sortable). The id is
//! recorded on the request span so all events emitted while handling the
//! request carry it.

use axum::body::Body;
use axum::http::{HeaderMap, Request};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Header carrying the caller-supplied correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Newtype wrapper for request correlation IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new UUID v7 request ID.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Extract the request ID from headers or generate a new UUID v7.
///
/// Empty or non-UTF-8 header values are treated as missing.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

/// Span factory for `TraceLayer::make_span_with`.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = extract_or_generate_request_id(request.headers());
    info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
