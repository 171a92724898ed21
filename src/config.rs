//! Application configuration management
//!
//! This module handles loading configuration from environment variables.
//! A `.env` file in the working directory is honoured. The output mode of the
//! request logger is fixed once, when the middleware state is built from it.

use std::env;
use std::sync::LazyLock;

use crate::constants::{
    DEFAULT_RUST_LOG, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SYSLOG_PROCESS,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logger: LoggerConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Request logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Send request lines to syslog instead of the terminal
    pub sys_write: bool,
    /// Process name reported to syslog
    pub syslog_process: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            sys_write: false,
            syslog_process: DEFAULT_SYSLOG_PROCESS.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            logger: LoggerConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.to_string()),
        })
    }
}

impl LoggerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let sys_write = match env::var("REQLOG_SYSLOG") {
            Ok(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("REQLOG_SYSLOG".to_string()))?,
            Err(_) => false,
        };

        Ok(Self {
            sys_write,
            syslog_process: env::var("REQLOG_SYSLOG_PROCESS")
                .unwrap_or_else(|_| DEFAULT_SYSLOG_PROCESS.to_string()),
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let logger = LoggerConfig::default();
        assert!(!logger.sys_write);
        assert_eq!(logger.syslog_process, "reqlog");
        assert_eq!(DEFAULT_SERVER_PORT, 8080);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" ON "), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool(""), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
