// Backend module - HTTP client for the color-detection server
//
// The dashboard talks to three endpoints:
// - GET /toggle_detection  flips detection, returns {"status": ...}
// - GET /stats             returns {"red", "yellow", "total_frames"}
// - GET /video_feed        multipart MJPEG stream (consumed by stream::probe)
//
// The `Backend` trait is the seam the controller depends on, so tests can
// script responses without a server.

mod models;

pub use models::{StatField, StatsSnapshot, ToggleResponse};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors from a single backend call
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection, protocol or body-read failure
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("backend returned HTTP {0}")]
    Status(u16),

    /// Body was not JSON or did not match the expected record
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

/// Remote operations the dashboard needs
#[async_trait]
pub trait Backend: Send + Sync {
    /// Flip detection on the server and report the resulting state
    async fn toggle_detection(&self) -> Result<ToggleResponse, BackendError>;

    /// Read the current counters
    async fn stats(&self) -> Result<StatsSnapshot, BackendError>;
}

/// reqwest-backed implementation
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    /// Build a client for `base_url`. No timeout is applied unless one is given.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("Invalid backend URL: {base_url}"))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, base })
    }

    /// Absolute URL for a backend path like "/stats"
    pub fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("Invalid endpoint path: {path}"))
    }

    async fn get_json(&self, path: &str) -> Result<Value, BackendError> {
        let url = self
            .endpoint(path)
            .map_err(|e| BackendError::Shape(e.to_string()))?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| BackendError::Shape(format!("invalid JSON from {path}: {e}")))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn toggle_detection(&self) -> Result<ToggleResponse, BackendError> {
        let body = self.get_json("/toggle_detection").await?;
        ToggleResponse::from_json(&body)
    }

    async fn stats(&self) -> Result<StatsSnapshot, BackendError> {
        let body = self.get_json("/stats").await?;
        StatsSnapshot::from_json(&body)
    }
}
