use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging to stderr, filtered by `RUST_LOG` or `default_filter`.
///
/// Stdout is left free for document output from the `generate` command.
///
/// ```
/// scribe::init_logging("info");
/// ```
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
