use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber.
///
/// With `TOKIO_CONSOLE` set, the tokio-console subscriber is installed
/// instead, so the runtime can be inspected live.
pub fn init_logging() {
    if std::env::var("TOKIO_CONSOLE").is_ok() {
        console_subscriber::init();
    } else {
        init_normal_logging();
    }
}

/// JSON logs, one flattened object per event, filtered by `RUST_LOG`
/// (default `info`).
pub fn init_normal_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .init();
}
