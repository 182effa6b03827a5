//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;
use crate::theme::Theme;

impl Config {
    /// Render the config as a commented TOML file
    pub fn to_toml(&self) -> String {
        let timeout = match self.request_timeout {
            Some(t) => format!("request_timeout_ms = {}", t.as_millis()),
            None => "# request_timeout_ms = 5000".to_string(),
        };

        format!(
            r#"# colorwatch configuration

# Detection backend (COLORWATCH_BACKEND_URL overrides)
backend_url = "{backend_url}"

# MJPEG stream path on the backend
stream_path = "{stream_path}"

# Stats poll cadence while detection is active (COLORWATCH_POLL_MS overrides)
poll_interval_ms = {poll_ms}

# Per-request timeout; leave unset to wait indefinitely
{timeout}

# Theme: {theme_names} (COLORWATCH_THEME overrides)
theme = "{theme}"

# Video stream reconnects
[watchdog]
max_retries = {max_retries}
retry_delay_ms = {retry_delay_ms}

# Toast notifications (always logged)
[notifications]
enabled = {notifications}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to TUI buffer or stdout)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            backend_url = self.backend_url,
            stream_path = self.stream_path,
            poll_ms = self.poll_interval.as_millis(),
            timeout = timeout,
            theme = self.theme,
            theme_names = Theme::NAMES.join(", "),
            max_retries = self.watchdog.max_retries,
            retry_delay_ms = self.watchdog.retry_delay.as_millis(),
            notifications = self.notifications.enabled,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string().replace('\\', "/"),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
