//! Config sections: watchdog, notifications, logging
//!
//! Each section has a resolved struct and an all-optional `File*` twin that
//! mirrors what may appear in the TOML file. `from_file()` fills the gaps
//! from defaults.

use crate::dashboard::watchdog::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Stream Watchdog
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct WatchdogConfig {
    /// Reconnect attempts for the lifetime of the process
    pub max_retries: u32,
    /// Delay between a stream failure and the reconnect attempt
    pub retry_delay: Duration,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileWatchdog {
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

impl WatchdogConfig {
    pub fn from_file(file: Option<FileWatchdog>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            max_retries: file.max_retries.unwrap_or(defaults.max_retries),
            retry_delay: file
                .retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationConfig {
    /// Show toasts (they are logged either way)
    pub enabled: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileNotifications {
    pub enabled: Option<bool>,
}

impl NotificationConfig {
    pub fn from_file(file: Option<FileNotifications>) -> Self {
        Self {
            enabled: file.and_then(|f| f.enabled).unwrap_or(true),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

/// Log file rotation strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    /// Parse a rotation name; unknown values fall back to daily
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Write JSON log files in addition to the TUI buffer or stdout
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// e.g. "colorwatch" -> "colorwatch.2026-01-15"
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "colorwatch".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            level: file.level.unwrap_or(defaults.level),
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file.file_dir.map(PathBuf::from).unwrap_or(defaults.file_dir),
            file_rotation: file
                .file_rotation
                .map(|s| LogRotation::parse(&s))
                .unwrap_or(defaults.file_rotation),
            file_prefix: file.file_prefix.unwrap_or(defaults.file_prefix),
        }
    }
}
