/*!
 * Configuration types for space-builder
 */

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{BuildError, Result};

/// Main configuration for build operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Base URL of the Hub (API and space pages)
    #[serde(default = "default_hub_endpoint")]
    pub hub_endpoint: String,

    /// SDK the target space is created with
    #[serde(default = "default_space_sdk")]
    pub space_sdk: String,

    /// Entry-point filename inside the target space
    #[serde(default = "default_path_in_repo")]
    pub path_in_repo: String,

    /// Fixed delay before uploading to a freshly created space
    #[serde(default = "default_upload_delay_ms")]
    pub upload_delay_ms: u64,

    /// Readiness probes after the fixed delay (0 = skip polling)
    #[serde(default = "default_readiness_attempts")]
    pub readiness_attempts: u32,

    /// Delay between readiness probes
    #[serde(default = "default_readiness_interval_ms")]
    pub readiness_interval_ms: u64,

    /// Timeout for a single HTTP request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Delete the created space when the upload fails
    #[serde(default)]
    pub rollback_on_upload_failure: bool,

    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stderr)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,

    /// Bind address for the web form
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            hub_endpoint: default_hub_endpoint(),
            space_sdk: default_space_sdk(),
            path_in_repo: default_path_in_repo(),
            upload_delay_ms: default_upload_delay_ms(),
            readiness_attempts: default_readiness_attempts(),
            readiness_interval_ms: default_readiness_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            rollback_on_upload_failure: false,
            log_level: LogLevel::Info,
            log_file: None,
            verbose: false,
            bind_addr: default_bind_addr(),
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

// Default value functions for serde
fn default_hub_endpoint() -> String {
    "https://huggingface.co".to_string()
}

fn default_space_sdk() -> String {
    "gradio".to_string()
}

fn default_path_in_repo() -> String {
    "app.py".to_string()
}

fn default_upload_delay_ms() -> u64 {
    1000
}

fn default_readiness_attempts() -> u32 {
    5
}

fn default_readiness_interval_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_bind_addr() -> String {
    "127.0.0.1:7860".to_string()
}

impl BuilderConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BuildError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: BuilderConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, else the per-user config file, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config_dir>/space-builder/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("space-builder").join("config.toml"))
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.hub_endpoint).map_err(|e| {
            BuildError::Config(format!("Invalid hub_endpoint '{}': {}", self.hub_endpoint, e))
        })?;
        if self.path_in_repo.trim().is_empty() {
            return Err(BuildError::Config("path_in_repo must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(BuildError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Hub endpoint without a trailing slash
    pub fn hub_base(&self) -> &str {
        self.hub_endpoint.trim_end_matches('/')
    }

    /// Browsable URL of a space
    pub fn space_url(&self, repo_id: &str) -> String {
        format!("{}/spaces/{}", self.hub_base(), repo_id)
    }

    pub fn upload_delay(&self) -> Duration {
        Duration::from_millis(self.upload_delay_ms)
    }

    pub fn readiness_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Configuration for tests and local runs: no waiting before upload
    pub fn immediate() -> Self {
        Self {
            upload_delay_ms: 0,
            readiness_attempts: 0,
            readiness_interval_ms: 0,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = BuilderConfig::default();
        assert_eq!(config.hub_endpoint, "https://huggingface.co");
        assert_eq!(config.space_sdk, "gradio");
        assert_eq!(config.path_in_repo, "app.py");
        assert_eq!(config.upload_delay(), Duration::from_secs(1));
        assert!(!config.rollback_on_upload_failure);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_space_url_strips_trailing_slash() {
        let config = BuilderConfig {
            hub_endpoint: "http://localhost:8080/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.space_url("alice/mixer"),
            "http://localhost:8080/spaces/alice/mixer"
        );
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
hub_endpoint = "http://127.0.0.1:9000"
upload_delay_ms = 250
rollback_on_upload_failure = true
log_level = "debug"
"#
        )
        .unwrap();

        let config = BuilderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.hub_endpoint, "http://127.0.0.1:9000");
        assert_eq!(config.upload_delay_ms, 250);
        assert!(config.rollback_on_upload_failure);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.readiness_attempts, 5);
        assert_eq!(config.path_in_repo, "app.py");
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"hub_endpoint = "not a url""#).unwrap();

        let err = BuilderConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, BuildError::Config(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "upload_delay_ms = [").unwrap();

        assert!(matches!(
            BuilderConfig::from_file(file.path()),
            Err(BuildError::Config(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = BuilderConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(BuildError::Config(_))));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Debug.to_tracing_level(), tracing::Level::DEBUG);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }

    #[test]
    fn test_immediate_has_no_waits() {
        let config = BuilderConfig::immediate();
        assert_eq!(config.upload_delay(), Duration::ZERO);
        assert_eq!(config.readiness_attempts, 0);
    }
}
