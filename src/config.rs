//! Runtime configuration for the `net-validators` binary.
//!
//! Values come from the environment (after `dotenv` has loaded `.env` in
//! `main`). The library itself never reads the environment: the parsed
//! [`Config`] is turned into an explicit [`RangeClassifier`].

use crate::error::ParseError;
use crate::models::{parse_cidr, CidrBlock};
use crate::processing::RangeClassifier;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Path of the log4rs YAML file.
pub const ENV_LOG_CONFIG: &str = "NETVAL_LOG_CONFIG";
/// Output format, `text` or `json`.
pub const ENV_OUTPUT: &str = "NETVAL_OUTPUT";
/// Comma-separated CIDR blocks classified as reserved.
pub const ENV_EXTRA_RESERVED: &str = "NETVAL_EXTRA_RESERVED";

const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{variable}: unknown output format {value:?} (expected text or json)")]
    InvalidOutput { variable: &'static str, value: String },

    #[error("{variable}: {source}")]
    InvalidCidr {
        variable: &'static str,
        #[source]
        source: ParseError,
    },
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_config: PathBuf,
    pub output: OutputFormat,
    pub extra_reserved: Vec<CidrBlock>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_config: PathBuf::from(DEFAULT_LOG_CONFIG),
            output: OutputFormat::default(),
            extra_reserved: vec![],
        }
    }
}

impl Config {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup(ENV_LOG_CONFIG).filter(|p| !p.is_empty()) {
            config.log_config = PathBuf::from(path);
        }

        if let Some(value) = lookup(ENV_OUTPUT).filter(|v| !v.is_empty()) {
            config.output = value.parse().map_err(|value| ConfigError::InvalidOutput {
                variable: ENV_OUTPUT,
                value,
            })?;
        }

        if let Some(list) = lookup(ENV_EXTRA_RESERVED) {
            config.extra_reserved = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    parse_cidr(s).map_err(|source| ConfigError::InvalidCidr {
                        variable: ENV_EXTRA_RESERVED,
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
        }

        log::debug!("Config loaded: {config:?}");
        Ok(config)
    }

    /// Classifier honouring the configured extra reservations.
    pub fn classifier(&self) -> RangeClassifier {
        RangeClassifier::with_extra_reserved(&self.extra_reserved)
    }
}
