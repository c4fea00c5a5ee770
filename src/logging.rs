use tracing_subscriber::{fmt, EnvFilter};

/// Logs go to stderr: stdout carries the JSON-RPC protocol stream.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
