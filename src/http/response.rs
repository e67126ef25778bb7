//! Response handling and error mapping.
//!
//! # Responsibilities
//! - Map backend errors to appropriate HTTP status codes
//! - Serialize every error as `{"code", "message"}` JSON
//! - Keep internal failure detail in logs, never in responses
//!
//! # Design Decisions
//! - Domain errors (not found, invalid input, conflict, unavailable) → 4xx/503
//! - Everything else → 500 with a fixed message
//! - Request rejections (bad JSON, bad path, bad repo) are 400s like any
//!   invalid input
//! - Protocol failures raised outside handlers (405, 408, 413) use the same
//!   body, see `middleware::errors`

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::model::cli_module::UnknownRepo;
use crate::services::ServiceError;

/// Message returned for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Error returned by route group handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    MethodNotAllowed(String),
    RequestTimeout(String),
    PayloadTooLarge(String),
    Unavailable(String),
    /// Detail is logged, not returned.
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::NotFound(_) => "NotFound",
            ApiError::Conflict(_) => "Conflict",
            ApiError::MethodNotAllowed(_) => "MethodNotAllowed",
            ApiError::RequestTimeout(_) => "RequestTimeout",
            ApiError::PayloadTooLarge(_) => "PayloadTooLarge",
            ApiError::Unavailable(_) => "ServiceUnavailable",
            ApiError::Internal(_) => "InternalError",
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            ServiceError::InvalidInput(msg) => ApiError::BadRequest(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Unavailable(msg) => ApiError::Unavailable(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        if rejection.status().is_server_error() {
            ApiError::Internal(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<UnknownRepo> for ApiError {
    fn from(err: UnknownRepo) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let message = match self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error while handling request");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::RequestTimeout(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::Unavailable(msg) => {
                tracing::debug!(status = %status, message = %msg, "Request failed");
                msg
            }
        };

        (
            status,
            Json(ErrorBody {
                code: code.to_string(),
                message,
            }),
        )
            .into_response()
    }
}
