//! libSQL database configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_path() -> PathBuf {
    PathBuf::from("roster.db")
}

/// Default SQLite busy timeout in milliseconds.
const fn default_busy_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path of the local database file. `:memory:` opens a throwaway database.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// How long a writer waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    /// Whether the configured path is the in-memory sentinel.
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == ":memory:"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, PathBuf::from("roster.db"));
        assert_eq!(config.busy_timeout_ms, 5000);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn memory_sentinel_detected() {
        let config = DatabaseConfig {
            path: PathBuf::from(":memory:"),
            ..Default::default()
        };
        assert!(config.is_in_memory());
    }
}
