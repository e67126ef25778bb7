//! Metrics collection and exposition.
//!
//! # Metrics
//! - `aaz_requests_total` (counter): requests by group, method, status
//! - `aaz_request_duration_seconds` (histogram): latency by group
//! - `aaz_route_groups_registered` (gauge): groups attached at startup
//!
//! # Design Decisions
//! - The `group` label comes from the routing table, never the raw path,
//!   so cardinality stays bounded by the number of groups
//! - Requests no group owns are labelled `none`

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

pub mod names {
    pub const REQUESTS_TOTAL: &str = "aaz_requests_total";
    pub const REQUEST_DURATION_SECONDS: &str = "aaz_request_duration_seconds";
    pub const ROUTE_GROUPS_REGISTERED: &str = "aaz_route_groups_registered";
}

/// Label used for requests outside every group.
pub const UNROUTED: &str = "none";

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> bool {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(address = %addr, "Prometheus exporter listening");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, address = %addr, "Failed to install Prometheus exporter");
            false
        }
    }
}

/// Record one completed request.
pub fn record_request(group: &str, method: &str, status: u16, start: Instant) {
    counter!(
        names::REQUESTS_TOTAL,
        "group" => group.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(names::REQUEST_DURATION_SECONDS, "group" => group.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_groups_registered(count: usize) {
    gauge!(names::ROUTE_GROUPS_REGISTERED).set(count as f64);
}
