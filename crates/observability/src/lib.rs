//! Process-wide tracing/logging setup.

use tracing_subscriber::EnvFilter;

/// Install the JSON tracing subscriber for the process.
///
/// Filtering comes from `RUST_LOG` (default `info`). Safe to call more than
/// once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(false)
        .try_init();
}
