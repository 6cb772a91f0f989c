/*!
 * Logging and tracing initialization
 *
 * Build steps log under `space_builder`. The web server's request traces
 * come from `tower_http` and only show up at debug level, and the HTTP
 * client crates stay at warn unless `RUST_LOG` says otherwise.
 */

use std::fs::File;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::BuilderConfig;
use crate::error::{BuildError, Result};

/// Resolve the effective level: `verbose` wins over `log_level`
pub fn effective_level(config: &BuilderConfig) -> Level {
    if config.verbose {
        Level::DEBUG
    } else {
        config.log_level.to_tracing_level()
    }
}

/// Filter directives used when `RUST_LOG` is unset
pub fn filter_directives(config: &BuilderConfig) -> String {
    let level = effective_level(config);
    let requests = if level == Level::DEBUG || level == Level::TRACE {
        level
    } else {
        Level::WARN
    };
    format!(
        "space_builder={},tower_http={},reqwest=warn,hyper=warn",
        level, requests
    )
}

/// Where log events are written
enum LogSink {
    /// Human-readable, keeps stdout free for results
    Stderr,
    /// JSON lines with span timings
    File(File),
}

impl LogSink {
    fn open(config: &BuilderConfig) -> Result<Self> {
        match config.log_file {
            Some(ref path) => File::create(path).map(LogSink::File).map_err(|e| {
                BuildError::Config(format!(
                    "Failed to create log file {}: {}",
                    path.display(),
                    e
                ))
            }),
            None => Ok(LogSink::Stderr),
        }
    }
}

/// Initialize structured logging based on configuration
///
/// The log file is opened before anything is installed, so a bad path
/// leaves the process without a subscriber rather than half-configured.
pub fn init_logging(config: &BuilderConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directives(config)))
        .map_err(|e| BuildError::Config(format!("Failed to create log filter: {}", e)))?;

    let (stderr_layer, file_layer) = match LogSink::open(config)? {
        LogSink::Stderr => (
            Some(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            ),
            None,
        ),
        LogSink::File(file) => (
            None,
            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .json(),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| BuildError::Config(format!("Logging already initialized: {}", e)))
}

/// Route events to the test harness output, once per process
#[cfg(test)]
pub fn init_test_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("space_builder=debug"));
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_test_writer().compact())
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_verbose_overrides_log_level() {
        let config = BuilderConfig {
            log_level: LogLevel::Error,
            verbose: true,
            ..Default::default()
        };
        assert_eq!(effective_level(&config), Level::DEBUG);
    }

    #[test]
    fn test_log_level_used_when_not_verbose() {
        let config = BuilderConfig {
            log_level: LogLevel::Warn,
            verbose: false,
            ..Default::default()
        };
        assert_eq!(effective_level(&config), Level::WARN);
    }

    #[test]
    fn test_request_traces_only_when_debugging() {
        let info = BuilderConfig::default();
        assert_eq!(
            filter_directives(&info),
            "space_builder=INFO,tower_http=WARN,reqwest=warn,hyper=warn"
        );

        let verbose = BuilderConfig {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(
            filter_directives(&verbose),
            "space_builder=DEBUG,tower_http=DEBUG,reqwest=warn,hyper=warn"
        );
        assert!(EnvFilter::try_new(filter_directives(&verbose)).is_ok());
    }

    #[test]
    fn test_unwritable_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuilderConfig {
            log_file: Some(dir.path().join("no-such-dir").join("build.log")),
            ..Default::default()
        };

        let err = init_logging(&config).unwrap_err();
        assert!(matches!(err, BuildError::Config(ref msg) if msg.contains("build.log")));
    }
}
