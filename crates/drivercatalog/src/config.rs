use std::{env, time::Duration};

use crate::storage::table::{PollSettings, DEFAULT_TABLE_NAME};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Driver table name (default: "Drivers")
    pub table_name: String,
    /// Delay between table status polls in milliseconds (default: 1,000)
    pub poll_interval_ms: u64,
    /// Maximum number of table status polls (default: 60)
    pub max_poll_attempts: u32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DRIVERS_TABLE_NAME` - Driver table name (default: "Drivers")
    /// - `TABLE_POLL_INTERVAL_MS` - Table status poll interval (default: 1,000)
    /// - `TABLE_MAX_POLL_ATTEMPTS` - Table status poll budget (default: 60)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source. Values that
    /// fail to parse fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            table_name: lookup("DRIVERS_TABLE_NAME")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            poll_interval_ms: lookup("TABLE_POLL_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(1_000),
            max_poll_attempts: lookup("TABLE_MAX_POLL_ATTEMPTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Get the table polling settings.
    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.max_poll_attempts,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
