use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for CLI runs.
///
/// Defaults to `info` for our crates; `RUST_LOG` overrides as usual.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
