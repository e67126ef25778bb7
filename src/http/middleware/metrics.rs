//! Per-request metrics, labelled by owning route group.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::observability::metrics::{self, UNROUTED};
use crate::routing::RoutingTable;

pub async fn track_metrics(
    State(table): State<Arc<RoutingTable>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let group = table.owner_of(req.uri().path()).unwrap_or(UNROUTED);
    let method = req.method().to_string();

    let response = next.run(req).await;

    metrics::record_request(group, &method, response.status().as_u16(), start);
    response
}
