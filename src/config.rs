//! Runtime configuration from the environment.
//!
//! `.env` is loaded first when present (`dotenvy`), then:
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `POSTBOARD_HOST` | `0.0.0.0` | interface to bind |
//! | `POSTBOARD_PORT` | `5002` | port to bind |
//! | `POSTBOARD_SEED` | `true` | start with the two sample posts |
//! | `LOG_FORMAT` | `compact` | `compact` or `json` |
//!
//! `RUST_LOG` is read separately by [`logging::init`](crate::logging::init).

use std::str::FromStr;

use thiserror::Error as ThisError;

use crate::error::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5002;

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a port number in 1..=65535, got `{value}`")]
    InvalidPort { var: &'static str, value: String },
    #[error("{var} must be `true` or `false`, got `{value}`")]
    InvalidBool { var: &'static str, value: String },
    #[error("LOG_FORMAT must be `compact` or `json`, got `{0}`")]
    InvalidLogFormat(String),
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub seed: bool,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            seed: true,
            log_format: LogFormat::Compact,
        }
    }
}

impl Config {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();
        Ok(Self::from_lookup(|key| std::env::var(key).ok())?)
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(host) = lookup("POSTBOARD_HOST") {
            let host = host.trim();
            if host.is_empty() {
                return Err(ConfigError::Empty { var: "POSTBOARD_HOST" });
            }
            cfg.host = host.to_owned();
        }
        if let Some(port) = lookup("POSTBOARD_PORT") {
            cfg.port = match port.trim().parse::<u16>() {
                Ok(p) if p != 0 => p,
                _ => return Err(ConfigError::InvalidPort { var: "POSTBOARD_PORT", value: port }),
            };
        }
        if let Some(seed) = lookup("POSTBOARD_SEED") {
            cfg.seed = parse_bool("POSTBOARD_SEED", &seed)?;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            cfg.log_format = format.parse()?;
        }

        Ok(cfg)
    }

    /// `host:port`, bracketing IPv6 literals.
    pub fn bind_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value: value.to_owned() }),
    }
}
