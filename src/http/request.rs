//! Request identification.
//!
//! # Responsibilities
//! - Assign a UUID v4 `x-request-id` to requests that arrive without one
//! - Echo the id back on the response
//! - Expose the id to trace spans
//!
//! # Design Decisions
//! - A client-supplied id is kept, so callers can correlate their own logs
//! - Request ID added as early as possible (outermost layer)

use axum::http::header::HeaderName;
use axum::http::Request;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const X_REQUEST_ID: &str = "x-request-id";

fn header_name() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

/// Layer that fills in a missing `x-request-id`.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(header_name(), MakeRequestUuid)
}

/// Layer that copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(header_name())
}

/// The request's id, if it has a readable one.
pub fn request_id<B>(req: &Request<B>) -> Option<&str> {
    req.headers().get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
}
