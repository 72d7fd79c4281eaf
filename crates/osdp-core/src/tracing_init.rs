//! Shared tracing/logging initialization.
//!
//! Hosts embedding the OSDP primitives set up `tracing_subscriber` with an
//! env-filter and optional JSON output. Protocol lines from a
//! [`crate::logger::Logger`] reach the same subscriber through
//! [`crate::logger::TracingSink`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;
use crate::logger::LogLevel;

/// Initialise the global tracing subscriber.
///
/// * `default_filter` -- default `RUST_LOG` value when the env-var is not set
///   (e.g. `"osdp=info"`).
/// * `log_json` -- when `true`, emit structured JSON log lines instead of the
///   human-readable format.
pub fn init_tracing(default_filter: &str, log_json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );
    if log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialise tracing from the `log` section of the config.
pub fn init_from_config(config: &LogConfig) {
    init_tracing(&default_filter(config.level), config.json);
}

/// Filter directive enabling the `osdp` targets at `level`.
pub fn default_filter(level: LogLevel) -> String {
    format!(
        "osdp={level},osdp_core={level},osdp_crypto={level}",
        level = level.as_tracing()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_maps_protocol_levels() {
        assert_eq!(
            default_filter(LogLevel::Debug),
            "osdp=DEBUG,osdp_core=DEBUG,osdp_crypto=DEBUG"
        );
        assert!(default_filter(LogLevel::Critical).starts_with("osdp=ERROR"));
        assert!(default_filter(LogLevel::Notice).starts_with("osdp=INFO"));
    }

    #[test]
    fn filter_is_accepted_by_env_filter() {
        for level in LogLevel::ALL {
            assert!(tracing_subscriber::EnvFilter::try_new(default_filter(level)).is_ok());
        }
    }
}
