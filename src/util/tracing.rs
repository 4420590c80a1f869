use tracing::subscriber::DefaultGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Initializes the `tracing` logging framework.
///
/// Output is influenced by the
/// [`RUST_LOG`](tracing_subscriber::filter::EnvFilter) environment variable
/// and defaults to `INFO` level events.
pub fn init() {
    init_with_default_level(LevelFilter::INFO)
}

/// Initializes the `tracing` logging framework with a custom default level
/// that is used if `RUST_LOG` is not set.
pub fn init_with_default_level(level: LevelFilter) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();
}

/// Installs a subscriber for the current test thread that writes through the
/// test harness, so the output is only shown for failing tests.
pub fn init_for_test() -> DefaultGuard {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter)
        .with_test_writer()
        .finish();

    tracing::subscriber::set_default(subscriber)
}
