//! Configuration tests
//!
//! Round-trips guard the hand-written TOML template: a field added to
//! `Config` but forgotten in `to_toml()` shows up here.

use super::*;
use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed = Config::parse_file(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );

    let resolved = Config::resolve(parsed.unwrap(), no_env);
    assert_eq!(resolved, config);
}

#[test]
fn test_config_roundtrip_customized() {
    let mut config = Config {
        backend_url: "http://camera.local:8080".to_string(),
        stream_path: "/feed".to_string(),
        poll_interval: Duration::from_millis(500),
        request_timeout: Some(Duration::from_millis(1500)),
        theme: "Terminal".to_string(),
        ..Config::default()
    };
    config.watchdog.max_retries = 5;
    config.watchdog.retry_delay = Duration::from_millis(750);
    config.notifications.enabled = false;
    config.logging.level = "debug".to_string();
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Hourly;
    config.logging.file_prefix = "cw".to_string();

    let parsed = Config::parse_file(&config.to_toml()).expect("custom config should parse");
    assert_eq!(Config::resolve(parsed, no_env), config);
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_file_yields_defaults() {
    let parsed = Config::parse_file("").unwrap();
    assert_eq!(Config::resolve(parsed, no_env), Config::default());
}

#[test]
fn test_env_overrides_file() {
    let parsed = Config::parse_file(
        r#"
backend_url = "http://from-file:5000"
poll_interval_ms = 4000
theme = "Terminal"
"#,
    )
    .unwrap();

    let env = env_from(&[
        ("COLORWATCH_BACKEND_URL", "http://from-env:9000"),
        ("COLORWATCH_POLL_MS", "250"),
    ]);
    let config = Config::resolve(parsed, env);

    assert_eq!(config.backend_url, "http://from-env:9000");
    assert_eq!(config.poll_interval, Duration::from_millis(250));
    // Not overridden by env
    assert_eq!(config.theme, "Terminal");
}

#[test]
fn test_invalid_env_poll_falls_back_to_file() {
    let parsed = Config::parse_file("poll_interval_ms = 3000").unwrap();
    let config = Config::resolve(parsed, env_from(&[("COLORWATCH_POLL_MS", "soon")]));
    assert_eq!(config.poll_interval, Duration::from_millis(3000));
}

#[test]
fn test_zero_env_poll_falls_back_to_file() {
    let parsed = Config::parse_file("poll_interval_ms = 3000").unwrap();
    let config = Config::resolve(parsed, env_from(&[("COLORWATCH_POLL_MS", "0")]));
    assert_eq!(config.poll_interval, Duration::from_millis(3000));
}

#[test]
fn test_zero_intervals_are_rejected() {
    let parsed = Config::parse_file("poll_interval_ms = 0\nrequest_timeout_ms = 0").unwrap();
    let config = Config::resolve(parsed, no_env);
    assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
    assert_eq!(config.request_timeout, None);
}

#[test]
fn test_headless_from_env() {
    let config = Config::resolve(FileConfig::default(), env_from(&[("COLORWATCH_HEADLESS", "1")]));
    assert!(config.headless);

    let config = Config::resolve(FileConfig::default(), env_from(&[("COLORWATCH_HEADLESS", "no")]));
    assert!(!config.headless);
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_partial_sections_keep_defaults() {
    let parsed = Config::parse_file(
        r#"
[watchdog]
max_retries = 1

[logging]
file_rotation = "weekly"
"#,
    )
    .unwrap();
    let config = Config::resolve(parsed, no_env);

    assert_eq!(config.watchdog.max_retries, 1);
    assert_eq!(config.watchdog.retry_delay, Duration::from_millis(2000));
    assert!(config.notifications.enabled);
    // Unknown rotation falls back to daily
    assert_eq!(config.logging.file_rotation, LogRotation::Daily);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_malformed_file_is_an_error() {
    assert!(Config::parse_file("poll_interval_ms = \"fast\"").is_err());
    assert!(Config::parse_file("[watchdog\nmax_retries = 3").is_err());
}
