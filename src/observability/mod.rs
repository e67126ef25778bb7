//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! main.rs
//!     → logging.rs  (tracing subscriber, once, before anything logs)
//!     → metrics.rs  (Prometheus exporter, only when enabled)
//!
//! Producers:
//!     → routing::registry  (groups registered gauge)
//!     → http::middleware   (per-request counter and latency)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing, pretty for terminals
//! - Request ID flows through every log line via the trace span
//! - Metric calls are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
