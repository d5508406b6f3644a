//! Dashboard runtime configuration.
//!
//! # Responsibility
//! - Provide defaults for storage path, dwell duration and log level.
//! - Apply `ADEL_*` environment overrides and host-supplied JSON.
//!
//! # Invariants
//! - Blank environment values are ignored, not treated as overrides.
//! - `dwell_ms` is never negative.

use crate::badge::controller::DEFAULT_DWELL_MS;
use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ADEL_DB_PATH";
pub const DWELL_MS_ENV: &str = "ADEL_BADGE_DWELL_MS";
pub const LOG_LEVEL_ENV: &str = "ADEL_LOG_LEVEL";
const DEFAULT_DB_FILE_NAME: &str = "adel_dashboard.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidDwell(String),
    InvalidJson(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDwell(value) => {
                write!(f, "dwell must be a non-negative integer of milliseconds, got `{value}`")
            }
            Self::InvalidJson(message) => write!(f, "invalid dashboard config: {message}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// SQLite file holding the key-value store.
    pub db_path: PathBuf,
    /// Milliseconds on the messages view before the badge is dismissed.
    pub dwell_ms: i64,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            dwell_ms: DEFAULT_DWELL_MS,
            log_level: default_log_level().to_string(),
        }
    }
}

impl DashboardConfig {
    /// Defaults with process environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup(key)` for each `ADEL_*` key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(raw) = read(DWELL_MS_ENV) {
            config.dwell_ms = parse_dwell(&raw)?;
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        Ok(config)
    }

    /// Parses host JSON; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::InvalidJson(err.to_string()))?;
        if config.dwell_ms < 0 {
            return Err(ConfigError::InvalidDwell(config.dwell_ms.to_string()));
        }
        Ok(config)
    }
}

fn parse_dwell(raw: &str) -> Result<i64, ConfigError> {
    match raw.parse::<i64>() {
        Ok(value) if value >= 0 => Ok(value),
        _ => Err(ConfigError::InvalidDwell(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DashboardConfig, DB_PATH_ENV, DWELL_MS_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn lookup_overrides_apply_and_blanks_are_ignored() {
        let env = HashMap::from([
            (DB_PATH_ENV, "  /var/lib/adel/state.db "),
            (DWELL_MS_ENV, "   "),
        ]);
        let config =
            DashboardConfig::from_lookup(|key| env.get(key).map(|value| value.to_string()))
                .expect("config should load");
        assert_eq!(config.db_path, PathBuf::from("/var/lib/adel/state.db"));
        assert_eq!(config.dwell_ms, 2_000);
    }

    #[test]
    fn negative_dwell_is_rejected() {
        let err = DashboardConfig::from_lookup(|key| {
            (key == DWELL_MS_ENV).then(|| "-5".to_string())
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidDwell("-5".to_string()));
    }

    #[test]
    fn json_keeps_defaults_for_missing_fields() {
        let config = DashboardConfig::from_json(r#"{"dwell_ms": 500}"#).unwrap();
        assert_eq!(config.dwell_ms, 500);
        assert_eq!(config.db_path, DashboardConfig::default().db_path);
    }
}
