//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Initialize every backend service
//! - Register the route groups against those backends
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - The listener is bound by the caller only after `bootstrap` returns,
//!   so no request can reach a partially initialized server

use thiserror::Error;

use crate::config::{validate_config, AppConfig, ConfigError};
use crate::http::HttpServer;
use crate::routing::{Registry, RegistryError};
use crate::services::{Backends, InitError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("backend initialization failed: {0}")]
    Backend(#[from] InitError),

    #[error("route registration failed: {0}")]
    Registry(#[from] RegistryError),
}

/// Build a ready-to-serve server from configuration.
pub fn bootstrap(config: AppConfig) -> Result<HttpServer, StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    let backends = Backends::init(&config)?;
    tracing::info!(
        aaz_path = %config.paths.aaz_path.display(),
        cli_path = %config.paths.cli_path.display(),
        cli_extension_path = %config.paths.cli_extension_path.display(),
        profiles = backends.profiles.len(),
        "Backends initialized"
    );

    let registered = Registry::standard(&backends).register()?;
    Ok(HttpServer::new(config, registered))
}
