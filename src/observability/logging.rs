//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Pick the filter from `RUST_LOG` or the configured level
//! - Switch between pretty and JSON output
//!
//! # Design Decisions
//! - `RUST_LOG` wins over config so operators can raise verbosity ad hoc
//! - Initialization is idempotent: a second call is ignored (tests call it freely)

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Default directive when neither `RUST_LOG` nor config narrow it down.
pub const DEFAULT_DIRECTIVES: &str = "aaz_dev_server=info,tower_http=info";

/// Build the filter for the given config.
pub fn build_filter(config: &ObservabilityConfig) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
    }
    EnvFilter::try_new(directives(&config.log_level)).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Expand a bare level (`debug`) into crate-scoped directives.
fn directives(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("aaz_dev_server={level},tower_http={level}")
    }
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    let filter = build_filter(config);

    let (pretty, json) = match config.log_format {
        LogFormat::Pretty => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json().with_current_span(true))),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_level_is_scoped_to_crate() {
        assert_eq!(directives("debug"), "aaz_dev_server=debug,tower_http=debug");
    }

    #[test]
    fn test_explicit_directives_pass_through() {
        assert_eq!(directives("aaz_dev_server=trace"), "aaz_dev_server=trace");
        assert_eq!(directives("warn,hyper=off"), "warn,hyper=off");
    }
}
