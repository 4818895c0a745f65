// Logging setup: a `tracing` subscriber on stderr so log lines never mix
// with prompts on stdout. `RUST_LOG` takes precedence over the configured
// level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

pub fn init(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        _ => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    }
}
