use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV: &str = "PROMPTPOS_LOG";

/// Installs the global tracing subscriber.
///
/// Logs go to stderr so stdout stays reserved for command output. The filter
/// comes from `PROMPTPOS_LOG` when set, otherwise from `log_level`.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();
}
