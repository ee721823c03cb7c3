//! Configuration loading and typed config structures for VR Lab.
//!
//! The canonical configuration lives in `vrlab-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads the file, falls back to
//! defaults when it is absent, and applies environment overrides.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Default configuration file name, resolved relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "vrlab-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
///
/// Mirrors the structure of `vrlab-config.yaml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where interaction events are submitted.
    #[serde(default)]
    pub collector: CollectorConfig,

    /// Environment session runtime settings.
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `VRLAB_HOST` overrides `server.host`
    /// - `VRLAB_PORT` overrides `server.port`
    /// - `COLLECTOR_URL` overrides `collector.endpoint`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from `path` if it exists, otherwise start from
    /// defaults. Environment overrides are applied either way.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        tracing::info!(path = %path.display(), "No config file found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override values with environment variables when set.
    ///
    /// This allows container deployments to set the listener and the
    /// collector endpoint without modifying the YAML config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("VRLAB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("VRLAB_PORT") {
            match val.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(e) => tracing::warn!(value = %val, error = %e, "Ignoring invalid VRLAB_PORT"),
            }
        }
        if let Ok(val) = std::env::var("COLLECTOR_URL") {
            self.collector.endpoint = Some(val).filter(|url| !url.is_empty());
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Collector configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectorConfig {
    /// Remote interactions endpoint. `None` means record in-process.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Per-request timeout for remote submissions.
    #[serde(default = "default_collector_timeout_ms")]
    pub timeout_ms: u64,
}

impl CollectorConfig {
    /// The request timeout as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: default_collector_timeout_ms(),
        }
    }
}

/// Environment session runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// How often the mountain weather changes.
    #[serde(default = "default_weather_interval_ms")]
    pub weather_interval_ms: u64,

    /// Capacity of each session's command queue.
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,

    /// A session that receives no command for this long shuts itself down.
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
}

impl SessionConfig {
    /// The weather re-roll period as a [`Duration`].
    pub const fn weather_interval(&self) -> Duration {
        Duration::from_millis(self.weather_interval_ms)
    }

    /// The idle timeout as a [`Duration`].
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            weather_interval_ms: default_weather_interval_ms(),
            command_buffer: default_command_buffer(),
            idle_timeout_ms: default_idle_timeout_ms(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_collector_timeout_ms() -> u64 {
    2000
}

const fn default_weather_interval_ms() -> u64 {
    10_000
}

const fn default_command_buffer() -> usize {
    64
}

const fn default_idle_timeout_ms() -> u64 {
    300_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert!(config.collector.endpoint.is_none());
        assert_eq!(config.session.weather_interval(), Duration::from_secs(10));
        assert_eq!(config.session.idle_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 9090

logging:
  level: "debug"
  json: true

collector:
  endpoint: "http://collector.local/api/interactions"
  timeout_ms: 500

session:
  weather_interval_ms: 2500
  command_buffer: 8
  idle_timeout_ms: 60000
"#;

        let config = AppConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert!(config.logging.json);
        assert_eq!(
            config.collector.endpoint.as_deref(),
            Some("http://collector.local/api/interactions")
        );
        assert_eq!(config.collector.timeout(), Duration::from_millis(500));
        assert_eq!(config.session.command_buffer, 8);
        assert_eq!(config.session.idle_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = AppConfig::parse("server:\n  port: 3000\n")
            .ok()
            .unwrap_or_default();

        assert_eq!(config.server.port, 3000);
        // Everything else uses defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.session.weather_interval_ms, 10_000);
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(AppConfig::parse("").ok(), Some(AppConfig::default()));
    }

    #[test]
    fn parse_rejects_malformed_yaml() {
        assert!(AppConfig::parse("server: [unclosed").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("does-not-exist.yaml");
        assert!(AppConfig::load_or_default(&path).is_ok());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(DEFAULT_CONFIG_FILE);
        if path.exists() {
            let config = AppConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
