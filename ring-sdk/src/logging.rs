//! Logging setup for applications built on the SDK
//!
//! The SDK only emits `tracing` events. Applications that want them printed
//! call [`init_logging`] or [`init_logging_from_env`] once at startup.

use std::str::FromStr;

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoggingMode {
    /// No subscriber is installed
    #[default]
    Silent,
    /// Compact stderr output, `info` and up
    Development,
    /// Verbose output with source locations
    Debug,
}

impl FromStr for LoggingMode {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" | "" => Ok(LoggingMode::Silent),
            "development" | "dev" => Ok(LoggingMode::Development),
            "debug" => Ok(LoggingMode::Debug),
            other => Err(LoggingError::InvalidEnv(format!(
                "RING_LOG_MODE={} (expected silent, development or debug)",
                other
            ))),
        }
    }
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid environment variable: {0}")]
    InvalidEnv(String),
}

/// Install a global subscriber for the given mode
///
/// # Environment Variables
///
/// - `RING_LOG_LEVEL`: filter directive, e.g. `debug` or `ring_api=trace`
/// - `RUST_LOG`: used when `RING_LOG_LEVEL` is unset
///
/// Fails if another global subscriber is already installed.
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let filter = create_env_filter("info", |key| std::env::var(key).ok())?;

            Registry::default()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let filter = create_env_filter("debug", |key| std::env::var(key).ok())?;

            Registry::default()
                .with(
                    fmt::layer()
                        .pretty()
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Initialize logging from `RING_LOG_MODE`
///
/// Unset means silent. An unrecognised value is an error rather than a
/// silent fallback.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = match std::env::var("RING_LOG_MODE") {
        Ok(value) => value.parse()?,
        Err(_) => LoggingMode::Silent,
    };

    init_logging(mode)
}

/// `RING_LOG_LEVEL`, then `RUST_LOG`, then `default_level`
fn create_env_filter<F>(default_level: &str, lookup: F) -> Result<EnvFilter, LoggingError>
where
    F: Fn(&str) -> Option<String>,
{
    let (source, directives) = match lookup("RING_LOG_LEVEL") {
        Some(level) => ("RING_LOG_LEVEL", level),
        None => match lookup("RUST_LOG") {
            Some(rust_log) => ("RUST_LOG", rust_log),
            None => return Ok(EnvFilter::new(default_level)),
        },
    };

    EnvFilter::try_new(&directives)
        .map_err(|e| LoggingError::InvalidEnv(format!("{}={}: {}", source, directives, e)))
}

/// Check whether a global subscriber is already installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_silent_mode() {
        assert!(init_logging(LoggingMode::Silent).is_ok());
    }

    #[rstest]
    #[case("silent", LoggingMode::Silent)]
    #[case("Development", LoggingMode::Development)]
    #[case("dev", LoggingMode::Development)]
    #[case(" debug ", LoggingMode::Debug)]
    fn test_mode_parsing(#[case] value: &str, #[case] expected: LoggingMode) {
        assert_eq!(value.parse::<LoggingMode>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(matches!(
            "chatty".parse::<LoggingMode>(),
            Err(LoggingError::InvalidEnv(_))
        ));
    }

    #[test]
    fn test_filter_precedence() {
        let filter = create_env_filter("info", |key| match key {
            "RING_LOG_LEVEL" => Some("ring_api=trace".to_string()),
            "RUST_LOG" => Some("warn".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(filter.to_string(), "ring_api=trace");

        let filter = create_env_filter("info", |key| {
            (key == "RUST_LOG").then(|| "warn".to_string())
        })
        .unwrap();
        assert_eq!(filter.to_string(), "warn");

        let filter = create_env_filter("debug", |_| None).unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_invalid_filter_names_its_source() {
        let err = create_env_filter("info", |key| {
            (key == "RING_LOG_LEVEL").then(|| "ring_api=loud".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("RING_LOG_LEVEL"));
    }
}
