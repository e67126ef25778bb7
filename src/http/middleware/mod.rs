//! Request middleware applied around every route group.

pub mod errors;
pub mod metrics;

pub use errors::structured_errors;
pub use metrics::track_metrics;
