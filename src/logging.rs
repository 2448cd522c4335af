//! Diagnostic logging setup.
//!
//! Logs go to **stderr** so stdout stays parseable for scripts. `RUST_LOG`
//! takes precedence over the configured `[logging] level`.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. Safe to call more than once;
/// later calls are ignored.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
