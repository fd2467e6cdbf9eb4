//! Tracing setup shared by binaries and tests.

use tracing_subscriber::EnvFilter;

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// - `RUST_LOG=info` - transitions (loaded, updated, token stored)
/// - `RUST_LOG=debug` - adds request parameters and timer arming
/// - `RUST_LOG=admin_framework=debug` - debug for the framework only
///
/// Safe to call more than once; later calls are ignored.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
