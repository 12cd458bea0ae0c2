//! Logging setup for Stratum.
//!
//! Installs a `tracing` subscriber with an environment-driven filter, a
//! human-readable console layer and, in debug builds, a JSON log file.
//! `log` records emitted by dependencies are captured through the
//! subscriber's `tracing-log` bridge.

use std::path::Path;

use stratum_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "stratum.log";

/// Filter directive taken from the config's `debug.log_level`, or the default.
pub fn filter_directive(config: Option<&Config>) -> String {
    config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the config's log level. When
/// `debug_build` is set and `log_dir` is writable, events are also written
/// as JSON to [`LOG_FILE_NAME`] inside it.
///
/// ```no_run
/// use stratum_config::Config;
/// use stratum_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let directive = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        tracing::debug!(filter = %directive, log_dir = %log_dir.display(), "logging initialized");
        return;
    }

    subscriber.init();
    tracing::debug!(filter = %directive, "logging initialized");
}

/// An `EnvFilter` built from [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
