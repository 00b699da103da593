use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Used when `RUST_LOG` is unset: request spans from `tower_http`, user store
/// and handler events from the `service` crate down to debug.
const DEFAULT_FILTER: &str = "info,service=debug,tower_http=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Compact one-line events on stdout, for running the mock server locally.
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// One JSON object per event with `user_id`, `count` and `error` fields at the
/// top level, for CI runs whose logs are collected.
pub fn init_logging_json() {
    let _ = fmt()
        .with_env_filter(env_filter())
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_writer(io::stdout)
        .try_init();
}

/// `LOG_FORMAT=json` selects the JSON output; anything else is compact.
pub fn init_logging_from_env() {
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => init_logging_json(),
        _ => init_logging_default(),
    }
}
