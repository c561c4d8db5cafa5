use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "TUBESCRIBE_LOG";

/// Initialize structured JSON logging.
///
/// Defaults to `info` level unless overridden by `TUBESCRIBE_LOG`.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_env_var(LOG_ENV)
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true),
        )
        .try_init();
}
