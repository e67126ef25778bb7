//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack, graceful shutdown)
//!     → request.rs (assign or propagate x-request-id)
//!     → middleware/metrics.rs (attribute the request to its route group)
//!     → [route group handler]
//!     → response.rs (ApiError → status + JSON body)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, X_REQUEST_ID};
pub use response::{ApiError, ApiResult, ErrorBody};
pub use server::HttpServer;
