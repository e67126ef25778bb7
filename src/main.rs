//! AAZ development server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (request id, trace, limits, timeout, metrics)
//!                         │
//!                         ▼
//!                     routing::registry (one nested router per group)
//!                         │
//!          ┌──────────────┼──────────────┬──────────────┐
//!          ▼              ▼              ▼              ▼
//!     /CLI/_cmds      /CLI/Az        /CLI/PS       /CLI/Portal
//!          │              │              │              │
//!          └──────────────┴──────┬───────┴──────────────┘
//!                                ▼
//!                 services (specs, modules, portal generator)
//!                                │
//!                                ▼
//!                  aaz / azure-cli / azure-cli-extensions on disk
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use aaz_dev_server::config::{load_config, AppConfig};
use aaz_dev_server::lifecycle::signals::spawn_signal_handler;
use aaz_dev_server::lifecycle::{bootstrap, Shutdown};
use aaz_dev_server::observability::{init_logging, metrics};

/// Command line overrides, applied on top of the config file.
#[derive(Parser, Debug)]
#[command(name = "aaz-dev-server")]
#[command(about = "Development server for AAZ code generation", long_about = None)]
struct Args {
    /// TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:5000.
    #[arg(short, long)]
    bind: Option<String>,

    /// Path of the aaz repository.
    #[arg(long, env = "AAZ_PATH")]
    aaz_path: Option<PathBuf>,

    /// Path of the azure-cli repository.
    #[arg(long, env = "CLI_PATH")]
    cli_path: Option<PathBuf>,

    /// Path of the azure-cli-extensions repository.
    #[arg(long, env = "CLI_EXTENSION_PATH")]
    cli_extension_path: Option<PathBuf>,

    /// Log level or filter directives.
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn apply(self, config: &mut AppConfig) {
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(path) = self.aaz_path {
            config.paths.aaz_path = path;
        }
        if let Some(path) = self.cli_path {
            config.paths.cli_path = path;
        }
        if let Some(path) = self.cli_extension_path {
            config.paths.cli_extension_path = path;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = Args::parse();

    let mut config = match args.config.take() {
        Some(path) => load_config(&path)?,
        None => AppConfig::default(),
    };
    args.apply(&mut config);

    init_logging(&config.observability);
    tracing::info!("aaz-dev-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                metrics::init_metrics(addr);
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let server = match bootstrap(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    // Bound only after every route group is attached.
    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    spawn_signal_handler(shutdown);

    server.run(listener, receiver).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
