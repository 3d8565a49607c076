//! Runtime configuration for the state layer.
//!
//! Read from environment variables:
//! - `PULSAR_DB_PATH`: SQLite database file path (default: "pulsar.db")
//! - `PULSAR_PERSIST_TIMEOUT_MS`: bound on each persistence call, in
//!   milliseconds (default: unbounded)

use std::time::Duration;

use crate::error::ConfigError;

pub const DB_PATH_VAR: &str = "PULSAR_DB_PATH";
pub const PERSIST_TIMEOUT_VAR: &str = "PULSAR_PERSIST_TIMEOUT_MS";
pub const DEFAULT_DB_PATH: &str = "pulsar.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateConfig {
    pub db_path: String,
    pub persist_timeout: Option<Duration>,
}

impl Default for StateConfig {
    fn default() -> Self {
        StateConfig {
            db_path: DEFAULT_DB_PATH.to_string(),
            persist_timeout: None,
        }
    }
}

impl StateConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_path = lookup(DB_PATH_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

        let persist_timeout = match lookup(PERSIST_TIMEOUT_VAR) {
            None => None,
            Some(raw) => {
                let ms: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidVar {
                        name: PERSIST_TIMEOUT_VAR,
                        value: raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
                if ms == 0 {
                    return Err(ConfigError::InvalidVar {
                        name: PERSIST_TIMEOUT_VAR,
                        value: raw,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Some(Duration::from_millis(ms))
            }
        };

        Ok(StateConfig {
            db_path,
            persist_timeout,
        })
    }

    pub fn with_db_path(mut self, db_path: impl Into<String>) -> Self {
        self.db_path = db_path.into();
        self
    }
}
