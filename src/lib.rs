//! AAZ development server library.
//!
//! Serves the code-generation API for Azure CLI and PowerShell modules as a
//! set of route groups, one per target platform, attached under fixed
//! prefixes by a static registry.

pub mod api;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod routing;
pub mod services;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::{bootstrap, Shutdown, StartupError};
pub use routing::{Registry, RoutingTable};
pub use services::Backends;
