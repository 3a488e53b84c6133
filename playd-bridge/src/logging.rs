//! Logging setup for applications embedding the bridge
//!
//! The bridge only ever emits through `tracing`; these helpers wire up
//! a subscriber for the common cases. Full-screen applications should
//! use [`init_silent`] so nothing leaks onto their display.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Logging mode for different environments
#[derive(Debug, Clone, Copy)]
pub enum LoggingMode {
    /// Drop all output
    Silent,
    /// Compact stderr output for development
    Development,
    /// Verbose output with source locations
    Debug,
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Initialize logging with the given mode
///
/// Call once, early, before constructing a bridge. The filter honors
/// `PLAYD_LOG_LEVEL`, then `RUST_LOG`, then the mode's default level.
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let subscriber = Registry::default()
                .with(fmt::layer().with_target(false).compact())
                .with(env_filter("info"));
            subscriber
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let subscriber = Registry::default()
                .with(fmt::layer().pretty().with_file(true).with_line_number(true))
                .with(env_filter("debug"));
            subscriber
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Initialize logging from `PLAYD_LOG_MODE`
///
/// Accepts "development" and "debug"; anything else (including unset)
/// stays silent so embedding applications render cleanly by default.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = match std::env::var("PLAYD_LOG_MODE").as_deref() {
        Ok("development") => LoggingMode::Development,
        Ok("debug") => LoggingMode::Debug,
        _ => LoggingMode::Silent,
    };
    init_logging(mode)
}

/// Shorthand for [`init_logging`] with [`LoggingMode::Silent`]
pub fn init_silent() -> Result<(), LoggingError> {
    init_logging(LoggingMode::Silent)
}

fn env_filter(default_level: &str) -> EnvFilter {
    if let Ok(level) = std::env::var("PLAYD_LOG_LEVEL") {
        EnvFilter::new(level)
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        EnvFilter::new(rust_log)
    } else {
        EnvFilter::new(default_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_mode() {
        assert!(init_logging(LoggingMode::Silent).is_ok());
    }
}
