//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer};
use strum::{Display, EnumString};

/// How inserts treat an id that is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DuplicateIdPolicy {
    /// Store the record anyway. Lookups by id return the first match.
    #[default]
    Allow,
    /// Refuse records whose id is already stored.
    Reject,
}

impl<'de> Deserialize<'de> for DuplicateIdPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    // === Storage ===
    /// Newline-delimited student records awaiting import.
    #[serde(default = "default_pending_import_path")]
    pub pending_import_path: PathBuf,

    /// Append-only log of every accepted student.
    #[serde(default = "default_student_log_path")]
    pub student_log_path: PathBuf,

    // === Insert Policy ===
    /// Duplicate id handling for both insert paths.
    #[serde(default)]
    pub duplicate_id_policy: DuplicateIdPolicy,

    // === Observability ===
    /// Install the Prometheus recorder and serve `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

fn default_port() -> u16 {
    3000
}

fn default_pending_import_path() -> PathBuf {
    PathBuf::from("insert.txt")
}

fn default_student_log_path() -> PathBuf {
    PathBuf::from("students.txt")
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            pending_import_path: default_pending_import_path(),
            student_log_path: default_student_log_path(),
            duplicate_id_policy: DuplicateIdPolicy::default(),
            metrics_enabled: default_true(),
            rust_log: default_log_level(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.pending_import_path.as_os_str().is_empty() {
            return Err("PENDING_IMPORT_PATH must not be empty".to_string());
        }

        if self.student_log_path.as_os_str().is_empty() {
            return Err("STUDENT_LOG_PATH must not be empty".to_string());
        }

        if self.pending_import_path == self.student_log_path {
            return Err("PENDING_IMPORT_PATH and STUDENT_LOG_PATH must differ".to_string());
        }

        Ok(())
    }
}
