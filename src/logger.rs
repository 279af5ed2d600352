use std::sync::Arc;
use std::time::Duration;

use spdlog::sink::{RotatingFileSink, RotationPolicy, StdStream, StdStreamSink};
use spdlog::{Level, LevelFilter, Logger};

use crate::config::{Config, LogLevel};

impl From<LogLevel> for Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Critical => Level::Critical,
            LogLevel::Error => Level::Error,
            LogLevel::Warn => Level::Warn,
            LogLevel::Info => Level::Info,
            LogLevel::Debug => Level::Debug,
            LogLevel::Trace => Level::Trace,
        }
    }
}

/// Replaces the default logger according to the `[log]` section.
/// Without that section the built-in default logger stays in place.
pub fn configure_logger(config: &Config) -> spdlog::Result<()> {
    let Some(ref log) = config.log else {
        return Ok(());
    };

    let mut builder = Logger::builder();

    if log.log_to_console {
        let stdout = Arc::new(
            StdStreamSink::builder()
                .std_stream(StdStream::Stdout)
                .level_filter(LevelFilter::MoreVerbose(Level::Warn))
                .build()?,
        );
        let stderr = Arc::new(
            StdStreamSink::builder()
                .std_stream(StdStream::Stderr)
                .level_filter(LevelFilter::MoreSevereEqual(Level::Warn))
                .build()?,
        );
        builder.sink(stdout).sink(stderr);
    }

    if let Some(ref location) = log.location {
        let file_sink = Arc::new(
            RotatingFileSink::builder()
                .base_path(location)
                .rotation_policy(RotationPolicy::Daily { hour: 0, minute: 0 })
                .max_files(30)
                .build()?,
        );
        builder.sink(file_sink);
    }

    let logger = Arc::new(builder.build()?);
    logger.set_level_filter(LevelFilter::MoreSevereEqual(log.level.into()));
    logger.set_flush_level_filter(LevelFilter::MoreSevereEqual(Level::Warn));
    logger.set_flush_period(Some(Duration::from_secs(5)));
    spdlog::set_default_logger(logger);

    Ok(())
}
