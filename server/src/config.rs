use std::borrow::Cow;

use appointment_db::REFERENCE_DATE;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration with `Cow` for the bind host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: Cow<'static, str>,
    pub port: u16,
    /// Anchor for the Today / Upcoming / Past tabs. Never read from the clock.
    pub reference_date: NaiveDate,
    /// Start with the reference appointments instead of an empty store
    pub seed_data: bool,
}

impl ServerConfig {
    /// Read configuration from environment variables with fallback
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key/value source.
    ///
    /// Recognized keys: `APPOINTMENTS_HOST`, `APPOINTMENTS_PORT`,
    /// `REFERENCE_DATE` (`YYYY-MM-DD`) and `SEED_DATA` (`true` / `false`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = lookup("APPOINTMENTS_HOST")
            .map(Cow::Owned)
            .unwrap_or(defaults.host);

        let port = match lookup("APPOINTMENTS_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "APPOINTMENTS_PORT",
                value: raw,
            })?,
            None => defaults.port,
        };

        let reference_date = match lookup("REFERENCE_DATE") {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                ConfigError::Invalid {
                    name: "REFERENCE_DATE",
                    value: raw,
                }
            })?,
            None => defaults.reference_date,
        };

        let seed_data = match lookup("SEED_DATA") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                name: "SEED_DATA",
                value: raw,
            })?,
            None => defaults.seed_data,
        };

        Ok(Self {
            host,
            port,
            reference_date,
            seed_data,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Cow::Borrowed("0.0.0.0"),
            port: 3000,
            reference_date: REFERENCE_DATE,
            seed_data: true,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
