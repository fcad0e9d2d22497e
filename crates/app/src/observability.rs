//! Process-wide tracing setup.

use tracing_subscriber::EnvFilter;

/// Initialize logging for the shell.
///
/// Compact console output for a client app; verbosity comes from
/// `RUST_LOG` and defaults to `info`. Safe to call multiple times
/// (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_target(false)
        .try_init();
}
