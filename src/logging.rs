//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Diagnostics go to stderr so they never interleave with the NDJSON event
//! stream on stdout. Level comes from the `CC_SERVER_LOG` environment
//! variable (e.g. "info", "debug"), defaulting to `warn`.

use tracing_subscriber::fmt;

/// Initialise the global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging() {
    let level = std::env::var("CC_SERVER_LOG")
        .ok()
        .and_then(|s| parse_level_str(&s))
        .unwrap_or(tracing::Level::WARN);

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
