//! Logging initialization for spamfinder binaries
//!
//! Console output goes to stderr so command output on stdout stays machine
//! readable. Supports JSON or human-readable formats, optional rotating file
//! output, and `RUST_LOG` overrides.

use std::fs;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Keeps the non-blocking file writer alive; hold it for the program duration.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize logging from `LoggingConfig`.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let subscriber = tracing_subscriber::registry().with(build_env_filter(config));

    let file_guard = if config.json {
        init_json_logging_with_subscriber(subscriber, config)?
    } else {
        init_human_logging_with_subscriber(subscriber, config)?
    };

    tracing::debug!(
        level = %config.level,
        json = config.json,
        file_enabled = config.file_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // sqlx logs every statement at info
        EnvFilter::new(format!(
            "spamfinder={},spamfinder_search={},sqlx=warn",
            config.level, config.level
        ))
    })
}

fn init_json_logging_with_subscriber<S>(
    subscriber: S,
    config: &LoggingConfig,
) -> anyhow::Result<Option<WorkerGuard>>
where
    S: SubscriberExt + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync + 'static,
{
    let console_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_writer(std::io::stderr);

    if config.file_enabled {
        let (file_appender, file_guard) = create_file_appender(config)?;
        let file_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(file_appender);

        subscriber.with(console_layer).with(file_layer).init();
        Ok(Some(file_guard))
    } else {
        subscriber.with(console_layer).init();
        Ok(None)
    }
}

fn init_human_logging_with_subscriber<S>(
    subscriber: S,
    config: &LoggingConfig,
) -> anyhow::Result<Option<WorkerGuard>>
where
    S: SubscriberExt + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync + 'static,
{
    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    if config.file_enabled {
        let (file_appender, file_guard) = create_file_appender(config)?;
        let file_layer = fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(file_appender);

        subscriber.with(console_layer).with(file_layer).init();
        Ok(Some(file_guard))
    } else {
        subscriber.with(console_layer).init();
        Ok(None)
    }
}

fn rotation(config: &LoggingConfig) -> Rotation {
    match config.file_rotation.as_str() {
        "hourly" => Rotation::HOURLY,
        "minutely" => Rotation::MINUTELY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

/// `<prefix>.log`, or `<prefix>.<period>.log` when rotating.
fn create_file_appender(
    config: &LoggingConfig,
) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&config.file_directory)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(rotation(config))
        .filename_prefix(config.file_prefix.as_str())
        .filename_suffix("log")
        .build(&config.file_directory)?;

    Ok(tracing_appender::non_blocking(file_appender))
}
