//! Application configuration loading, validation, and management.
//!
//! This module provides the top-level `Config` structure that aggregates
//! logging, poller, bridge, and server configurations. It handles loading
//! from TOML files, validation, and built-in defaults when no file exists.
//!
//! The configuration is loaded early in the application lifecycle and is
//! intended to remain immutable thereafter.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::config::{
    bridge::BridgeConfig, logger::LoggerConfig, poller::PollerConfig, server::ServerConfig,
};

pub mod bridge;
pub mod logger;
pub mod poller;
pub mod server;

/// Simple macros for printing timestamped messages before the tracing
/// subscriber is initialized. These are used during early configuration
/// loading.
#[macro_export]
macro_rules! print_info {
    ($($arg:tt)*) => {
        println!("{}  {} {}",
            console::style(
                time::OffsetDateTime::now_utc()
                    .format(&time::format_description::parse(
                        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
                    ).unwrap())
                    .unwrap()
            ).dim(),
            console::style("INFO").green(),
            format_args!($($arg)*)
        );
    };
}

#[macro_export]
macro_rules! print_warn {
    ($($arg:tt)*) => {
        println!("{}  {} {}",
            console::style(
                time::OffsetDateTime::now_utc()
                    .format(&time::format_description::parse(
                        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
                    ).unwrap())
                    .unwrap()
            ).dim(),
            console::style("WARN").yellow(),
            format_args!($($arg)*)
        );
    };
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {
        println!("{}  {} {}",
            console::style(
                time::OffsetDateTime::now_utc()
                    .format(&time::format_description::parse(
                        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
                    ).unwrap())
                    .unwrap()
            ).dim(),
            console::style("ERROR").red(),
            format_args!($($arg)*)
        );
    };
}

/// Errors that can occur during configuration loading, parsing, or
/// validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error while accessing configuration files.
    #[error("IO error while reading configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// Failure to parse the TOML configuration file.
    #[error("Parse error while reading configuration: {0}")]
    ParseError(String),

    /// Validation failure after successful parsing.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Top-level application configuration.
///
/// Combines logging, polling, bridge, and exposition server settings into
/// a single structure.
#[derive(Serialize, Deserialize, Debug, Validate, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// Logging subsystem configuration.
    #[validate(nested)]
    pub logger: LoggerConfig,

    /// Sensor polling and metric naming configuration.
    #[validate(nested)]
    pub poller: PollerConfig,

    /// Hue bridge connection configuration.
    #[validate(nested)]
    pub bridge: BridgeConfig,

    /// Scrape exposition server configuration.
    #[validate(nested)]
    pub server: ServerConfig,
}

impl Config {
    /// Constructs the configuration by locating and loading the config
    /// file, falling back to built-in defaults when none exists.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a located file cannot be read, parsed,
    /// or validated.
    pub fn new() -> Result<Self, ConfigError> {
        match Self::find_config_path() {
            Some(config_path) => Self::load(&config_path),
            None => {
                print_warn!("No configuration file found, using built-in defaults");
                Ok(Config::default())
            }
        }
    }

    /// Determines the configuration file path.
    ///
    /// Priority:
    /// 1. `HUEBEE_CONFIG` environment variable
    /// 2. `/etc/huebee/config.toml`
    fn find_config_path() -> Option<PathBuf> {
        if let Ok(config_path) = std::env::var("HUEBEE_CONFIG") {
            let path = PathBuf::from(config_path);
            print_info!("Using config from HUEBEE_CONFIG: {}", path.display());
            return Some(path);
        }

        let fallback = Path::new("/etc/huebee/config.toml");
        if fallback.exists() {
            print_info!("Using default config path: {}", fallback.display());
            return Some(fallback.to_path_buf());
        }

        None
    }

    /// Loads and validates configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Propagates IO, parsing, and validation errors as `ConfigError`.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        print_info!("Loading configuration from: {}", path.display());

        let config_str = fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&config_str).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        print_info!("Successfully loaded config from: {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn loads_a_partial_file_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[poller]
namespace = "hue"
poll_interval = 30

[bridge]
host = "192.168.1.20"
username = "abc123"

[server]
bind = "127.0.0.1:9101"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.poller.poll_interval, 30);
        assert_eq!(config.bridge.host.as_deref(), Some("192.168.1.20"));
        assert_eq!(config.server.bind, "127.0.0.1:9101");
        // Untouched sections keep their defaults.
        assert_eq!(config.logger.level, "info");
    }

    #[test]
    fn rejects_an_invalid_poll_interval() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[poller]
poll_interval = 0
"#
        )
        .unwrap();

        let result = Config::load(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "poller = not-a-table").unwrap();

        let result = Config::load(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = Config::load(Path::new("/nonexistent/huebee.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
