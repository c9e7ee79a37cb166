//! # wedear-logging
//!
//! Structured logging with `tracing`.
//!
//! - [`init_subscriber`]: compact human-readable output on stderr
//! - [`init_json_subscriber`]: one JSON object per line on stderr
//! - [`init_from_settings`]: pick one of the above from [`LoggingSettings`]
//! - [`test_utils::capture_logs`]: in-memory capture for assertions in tests
//!
//! All initializers honour `RUST_LOG` when set and fall back to the given
//! level otherwise. Subsequent calls are no-ops.

#![deny(unsafe_code)]

pub mod test_utils;

pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};

use tracing_subscriber::EnvFilter;
use wedear_settings::LoggingSettings;

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize the global tracing subscriber with compact stderr output.
///
/// # Arguments
///
/// * `level` - Minimum level when `RUST_LOG` is unset, e.g. `"info"`.
pub fn init_subscriber(level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // try_init fails if a global subscriber is already set
    let _ = subscriber.try_init();
}

/// Initialize the global tracing subscriber with JSON-lines stderr output.
pub fn init_json_subscriber(level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .flatten_event(true);

    let _ = subscriber.try_init();
}

/// Initialize logging from settings.
pub fn init_from_settings(settings: &LoggingSettings) {
    if settings.json {
        init_json_subscriber(&settings.level);
    } else {
        init_subscriber(&settings.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_subscriber_does_not_panic() {
        // Multiple calls should be safe (no-op after first)
        init_subscriber("warn");
        init_subscriber("debug");
        init_json_subscriber("info");
        init_from_settings(&LoggingSettings::default());
    }

    #[test]
    fn invalid_level_falls_back_without_panic() {
        let _filter = env_filter("not-a-level");
    }
}
