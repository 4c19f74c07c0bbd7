//! Diagnostic output shared by the binaries.
//!
//! Everything goes to stderr so stdout stays free for tool output. The level
//! defaults to `info` and follows `RUST_LOG` when it is set.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Calling it twice is harmless.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
