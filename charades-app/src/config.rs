use charades_core::STORAGE_KEY;
use charades_persistence::connection::DEFAULT_DATABASE_URL;
use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub storage_key: String,
    /// Unlocks deck selection and custom words
    pub premium: bool,
    /// Fixed shuffle seed, for reproducible sessions
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unset variables take defaults;
    /// set but unparsable ones are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let premium = match lookup("CHARADES_PREMIUM") {
            Some(value) => parse_flag("CHARADES_PREMIUM", &value)?,
            None => false,
        };
        let seed = match lookup("CHARADES_SEED") {
            Some(value) => Some(value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "CHARADES_SEED",
                value,
            })?),
            None => None,
        };

        Ok(Self {
            database_url: lookup("CHARADES_DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            storage_key: lookup("CHARADES_STORAGE_KEY").unwrap_or_else(|| STORAGE_KEY.to_string()),
            premium,
            seed,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            storage_key: STORAGE_KEY.to_string(),
            premium: false,
            seed: None,
        }
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}
