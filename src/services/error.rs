//! Error types raised by backend services.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a backend operation.
///
/// `NotFound`, `InvalidInput`, `Conflict` and `Unavailable` are domain
/// errors the caller can act on. `Io` and `Serialization` are internal
/// failures whose detail must not reach clients.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed data: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this is a recognized domain error.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::InvalidInput(_) | Self::Conflict(_) | Self::Unavailable(_)
        )
    }
}

/// Failure to construct a backend service at startup.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("{what} directory '{}' does not exist", path.display())]
    MissingDirectory { what: &'static str, path: PathBuf },

    #[error("command tree file '{}' does not exist", path.display())]
    MissingTree { path: PathBuf },

    #[error("failed to load '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ServiceError,
    },
}

pub type ServiceResult<T> = Result<T, ServiceError>;
