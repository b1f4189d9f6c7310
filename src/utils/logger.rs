use crate::config::toml_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn filter_for(level: Option<&str>, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match level {
        Some(level) => EnvFilter::new(format!("order_ingest={}", level)),
        None if verbose => EnvFilter::new("order_ingest=debug,info"),
        None => EnvFilter::new("order_ingest=info"),
    })
}

/// Installs a compact console logger. Returns `false` if a global subscriber was already set.
pub fn init_logger(verbose: bool) -> bool {
    init_compact(filter_for(None, verbose))
}

/// Installs a JSON logger for log collectors.
pub fn init_json_logger() -> bool {
    init_json(filter_for(None, false))
}

pub fn init_from_config(config: &LoggingConfig) -> bool {
    let filter = filter_for(config.level.as_deref(), false);
    match config.format {
        LogFormat::Compact => init_compact(filter),
        LogFormat::Json => init_json(filter),
    }
}

fn init_compact(filter: EnvFilter) -> bool {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .is_ok()
}

fn init_json(filter: EnvFilter) -> bool {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .try_init()
        .is_ok()
}
