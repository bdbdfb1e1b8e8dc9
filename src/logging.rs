use crate::config::Config;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. RUST_LOG wins over the configured filter.
pub fn init(config: &Config) {
    let log_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(log_filter).init();
}
