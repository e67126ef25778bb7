//! Structured bodies for errors produced below the handlers.
//!
//! The timeout and body limit layers, and axum's method routing, answer
//! with an empty or plain-text body. This middleware rewrites those into
//! the `{"code", "message"}` body every handler error uses, keeping the
//! original status and headers such as `Allow`.

use axum::body::Body;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::http::response::ApiError;

pub async fn structured_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    if is_json(&response) {
        return response;
    }

    let error = match response.status() {
        StatusCode::METHOD_NOT_ALLOWED => {
            ApiError::MethodNotAllowed(format!("method {} not allowed for '{}'", method, path))
        }
        StatusCode::REQUEST_TIMEOUT => {
            ApiError::RequestTimeout(format!("request to '{}' timed out", path))
        }
        StatusCode::PAYLOAD_TOO_LARGE => {
            ApiError::PayloadTooLarge("request body exceeds the configured limit".to_string())
        }
        _ => return response,
    };

    let (parts, _) = response.into_parts();
    let mut structured = error.into_response();
    for (name, value) in &parts.headers {
        if name != CONTENT_TYPE && name != CONTENT_LENGTH {
            structured.headers_mut().append(name.clone(), value.clone());
        }
    }
    structured
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::ErrorBody;
    use axum::body::to_bytes;
    use axum::http::header::ALLOW;
    use axum::routing::get;
    use axum::{middleware, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/slow", get(|| async { StatusCode::REQUEST_TIMEOUT }))
            .route("/teapot", get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }))
            .route(
                "/conflict",
                get(|| async { ApiError::Conflict("already there".into()) }),
            )
            .layer(middleware::from_fn(structured_errors))
    }

    async fn send(method: &str, uri: &str) -> Response {
        app()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn error_body(response: Response) -> ErrorBody {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_timeout_gets_structured_body() {
        let response = send("GET", "/slow").await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let body = error_body(response).await;
        assert_eq!(body.code, "RequestTimeout");
        assert_eq!(body.message, "request to '/slow' timed out");
    }

    #[tokio::test]
    async fn test_method_not_allowed_keeps_allow_header() {
        let response = send("DELETE", "/slow").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().get(ALLOW).is_some());
        assert_eq!(error_body(response).await.code, "MethodNotAllowed");
    }

    #[tokio::test]
    async fn test_other_responses_pass_through() {
        let response = send("GET", "/teapot").await;
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"short and stout");

        let response = send("GET", "/conflict").await;
        assert_eq!(error_body(response).await.message, "already there");
    }
}
