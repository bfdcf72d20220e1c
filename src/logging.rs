use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Filter directives, e.g. `TREASURER_LOG=treasurer=debug`.
pub const LOG_ENV: &str = "TREASURER_LOG";

const DEFAULT_FILTER: &str = "warn";

fn filter_from(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to stderr so command output on stdout stays clean.
pub fn init() {
    let filter = filter_from(std::env::var(LOG_ENV).ok());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .init();
}
