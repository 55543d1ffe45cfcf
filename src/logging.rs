//! Logging setup helpers
//!
//! Thin wrappers over `tracing-subscriber` so host applications and tests
//! can turn on structured logging with one call. Both helpers are no-ops if
//! a subscriber is already installed.

use tracing_subscriber::EnvFilter;

/// Initialize logging at `info` level, honoring `RUST_LOG` when set
pub fn init() {
    init_with_filter("info");
}

/// Initialize logging with the given default filter directives
///
/// `RUST_LOG` takes precedence when set.
pub fn init_with_filter(directives: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
