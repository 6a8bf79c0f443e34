//! Structured logging setup.
//!
//! Console-only tracing with environment-driven filtering. Uses `try_init` so
//! embedding contexts (tests, a host binary with its own subscriber) do not
//! panic on double initialization.

use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging once per process.
///
/// The filter comes from `RUST_LOG` when set, otherwise from the environment
/// name in `TASKBOARD_ENV` (debug everywhere except production).
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_log_level(&get_environment())));

        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true),
        );

        if subscriber.with(filter).try_init().is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }
    });
}

fn get_environment() -> String {
    std::env::var("TASKBOARD_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

fn default_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_defaults_to_info() {
        assert_eq!(default_log_level("production"), "info");
        assert_eq!(default_log_level("development"), "debug");
        assert_eq!(default_log_level("test"), "debug");
    }

    #[test]
    fn init_is_idempotent() {
        init_structured_logging();
        init_structured_logging();
    }
}
