//! Structured logging infrastructure for PhotoProof.
//!
//! Centralized `tracing-subscriber` initialization with plain or JSON output
//! and `RUST_LOG`-based filtering.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the logging system with human-readable output.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
/// If not set, defaults to `info` level.
///
/// # Example
/// ```no_run
/// use photoproof_core::logging;
///
/// logging::init();
/// tracing::info!("camera ready");
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .init();
}

/// Initialize the logging system with JSON output for log aggregation.
///
/// # Example
/// ```no_run
/// use photoproof_core::logging;
///
/// logging::init_json();
/// tracing::info!(component = "viewer", "verification agent started");
/// ```
pub fn init_json() {
    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().json().with_target(true).with_thread_ids(true))
        .init();
}

/// Initialize logging according to the `[logging]` configuration section.
pub fn init_from_config(config: &LoggingConfig) {
    if config.json {
        init_json();
    } else {
        init();
    }
}
