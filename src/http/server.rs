//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap the registered route groups in the middleware stack
//! - Answer unknown paths with a structured 404 and unsupported methods
//!   with a structured 405
//! - Bind to a listener and serve until shutdown is signalled
//!
//! # Design Decisions
//! - The server only ever receives a fully registered router; it cannot
//!   start without its route groups
//! - Layer order (outermost first): request id, trace, propagate id,
//!   metrics, structured errors, body limit, timeout. Metrics sit outside
//!   the timeout so timed out requests are counted

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Uri};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::http::middleware::{structured_errors, track_metrics};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::ApiError;
use crate::routing::{Registered, RoutingTable};

/// The development server: registered route groups plus middleware.
pub struct HttpServer {
    router: Router,
    table: Arc<RoutingTable>,
    config: AppConfig,
}

impl HttpServer {
    pub fn new(config: AppConfig, registered: Registered) -> Self {
        let table = Arc::new(registered.table);
        let router = Self::build_router(&config, registered.router, table.clone());
        Self {
            router,
            table,
            config,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, routes: Router, table: Arc<RoutingTable>) -> Router {
        routes
            .fallback(fallback)
            .method_not_allowed_fallback(method_not_allowed)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(middleware::from_fn(structured_errors))
            .layer(middleware::from_fn_with_state(table, track_metrics))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = request_id(req).unwrap_or("-"),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// The complete service, for in-process use (tests, embedding).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            groups = ?self.table.groups(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn fallback(uri: Uri) -> ApiError {
    ApiError::not_found(format!("no route for '{}'", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("method {} not allowed for '{}'", method, uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::metrics::names;
    use crate::routing::group::{GroupBuilder, GroupRoutes, RouteGroup};
    use crate::routing::Registry;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    struct SlowGroup;

    impl RouteGroup for SlowGroup {
        fn name(&self) -> &'static str {
            "slow"
        }

        fn prefix(&self) -> &'static str {
            "/CLI/Slow"
        }

        fn build(&self) -> GroupRoutes {
            GroupBuilder::new()
                .get("/Wait", || async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                })
                .finish(())
        }
    }

    fn server() -> HttpServer {
        let mut config = AppConfig::default();
        config.timeouts.request_secs = 1;
        let registered = Registry::new().with_group(SlowGroup).register().unwrap();
        HttpServer::new(config, registered)
    }

    #[tokio::test]
    async fn test_timed_out_request_is_structured_and_counted() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let response = server()
            .router()
            .oneshot(Request::builder().uri("/CLI/Slow/Wait").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "RequestTimeout");

        let rendered = handle.render();
        let counted = rendered.lines().any(|line| {
            line.starts_with(names::REQUESTS_TOTAL)
                && line.contains("group=\"slow\"")
                && line.contains("status=\"408\"")
        });
        assert!(counted, "{rendered}");
    }
}
