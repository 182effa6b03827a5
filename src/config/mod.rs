//! Configuration for the dashboard
//!
//! Configuration is loaded in order of precedence:
//! 1. Command-line flags (applied by `cli`)
//! 2. Environment variables
//! 3. Config file (~/.config/colorwatch/config.toml)
//! 4. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod sections;
mod serialization;

#[cfg(test)]
mod tests;

pub use sections::{
    FileLogging, FileNotifications, FileWatchdog, LogRotation, LoggingConfig, NotificationConfig,
    WatchdogConfig,
};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_STREAM_PATH: &str = "/video_feed";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
const DEFAULT_THEME: &str = "Pink";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the detection backend
    pub backend_url: String,

    /// Path of the MJPEG stream on the backend
    pub stream_path: String,

    /// Stats poll cadence while detection is active
    pub poll_interval: Duration,

    /// Per-request timeout; None leaves remote calls unbounded
    pub request_timeout: Option<Duration>,

    /// Theme name: "Pink", "Terminal"
    pub theme: String,

    /// Run without the terminal UI, logging to stdout instead
    pub headless: bool,

    pub watchdog: WatchdogConfig,
    pub notifications: NotificationConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            stream_path: DEFAULT_STREAM_PATH.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: None,
            theme: DEFAULT_THEME.to_string(),
            headless: false,
            watchdog: WatchdogConfig::default(),
            notifications: NotificationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure; every key is optional
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub backend_url: Option<String>,
    pub stream_path: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub theme: Option<String>,

    /// Optional [watchdog] section
    pub watchdog: Option<FileWatchdog>,

    /// Optional [notifications] section
    pub notifications: Option<FileNotifications>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/colorwatch/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("colorwatch").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Parse config file contents
    pub(crate) fn parse_file(contents: &str) -> Result<FileConfig> {
        toml::from_str(contents).context("Failed to parse configuration file")
    }

    /// Load file config if it exists. A file that exists but cannot be read
    /// or parsed is an error rather than a silent fallback to defaults.
    fn load_file_config() -> Result<FileConfig> {
        let Some(path) = Self::config_path() else {
            return Ok(FileConfig::default());
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_file(&contents)
                .with_context(|| format!("Invalid config at {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read config at {}", path.display())),
        }
    }

    /// Load configuration: env > file > defaults
    pub fn from_env() -> Result<Self> {
        let file = Self::load_file_config()?;
        Ok(Self::resolve(file, |key| std::env::var(key).ok()))
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let backend_url = env("COLORWATCH_BACKEND_URL")
            .or(file.backend_url)
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let stream_path = file
            .stream_path
            .unwrap_or_else(|| DEFAULT_STREAM_PATH.to_string());

        // Zero or unparsable env values fall through to the file
        let poll_interval = env("COLORWATCH_POLL_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .or(file.poll_interval_ms.filter(|ms| *ms > 0))
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let request_timeout = file
            .request_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);

        let theme = env("COLORWATCH_THEME")
            .or(file.theme)
            .unwrap_or_else(|| DEFAULT_THEME.to_string());

        // Headless toggle: env only (runtime flag)
        let headless = env("COLORWATCH_HEADLESS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            backend_url,
            stream_path,
            poll_interval,
            request_timeout,
            theme,
            headless,
            watchdog: WatchdogConfig::from_file(file.watchdog),
            notifications: NotificationConfig::from_file(file.notifications),
            logging: LoggingConfig::from_file(file.logging),
        }
    }
}
