//! Wire models for the detection backend
//!
//! Responses are decoded into `serde_json::Value` first and then coerced into
//! typed records. A payload that does not match the expected shape becomes a
//! `BackendError::Shape` instead of leaking into controller state.

use super::BackendError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status string the backend reports while detection is running
const ACTIVE_STATUS: &str = "active";

/// Counters reported by `GET /stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub red: u64,
    pub yellow: u64,
    pub total_frames: u64,
}

impl StatsSnapshot {
    /// Coerce a decoded `/stats` body into a snapshot
    pub fn from_json(value: &Value) -> Result<Self, BackendError> {
        let obj = value
            .as_object()
            .ok_or_else(|| BackendError::Shape(format!("stats body is not an object: {value}")))?;

        Ok(Self {
            red: count_field(obj, StatField::Red.key())?,
            yellow: count_field(obj, StatField::Yellow.key())?,
            total_frames: count_field(obj, StatField::TotalFrames.key())?,
        })
    }

    pub fn get(&self, field: StatField) -> u64 {
        match field {
            StatField::Red => self.red,
            StatField::Yellow => self.yellow,
            StatField::TotalFrames => self.total_frames,
        }
    }
}

/// One of the three counters shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatField {
    Red,
    Yellow,
    TotalFrames,
}

impl StatField {
    /// Display order, left to right
    pub const ALL: [StatField; 3] = [StatField::Red, StatField::Yellow, StatField::TotalFrames];

    /// JSON key in the `/stats` body
    pub fn key(&self) -> &'static str {
        match self {
            StatField::Red => "red",
            StatField::Yellow => "yellow",
            StatField::TotalFrames => "total_frames",
        }
    }

    /// Card heading
    pub fn label(&self) -> &'static str {
        match self {
            StatField::Red => "Red Objects",
            StatField::Yellow => "Yellow Objects",
            StatField::TotalFrames => "Total Frames",
        }
    }
}

/// Body of `GET /toggle_detection`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub status: String,
}

impl ToggleResponse {
    pub fn from_json(value: &Value) -> Result<Self, BackendError> {
        match value.get("status") {
            Some(Value::String(status)) => Ok(Self {
                status: status.clone(),
            }),
            Some(other) => Err(BackendError::Shape(format!(
                "toggle status is not a string: {other}"
            ))),
            None => Err(BackendError::Shape(format!(
                "toggle body has no status: {value}"
            ))),
        }
    }

    /// Anything other than exactly "active" counts as paused
    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }
}

fn count_field(obj: &Map<String, Value>, key: &str) -> Result<u64, BackendError> {
    let value = obj
        .get(key)
        .ok_or_else(|| BackendError::Shape(format!("missing field `{key}`")))?;

    if let Some(n) = value.as_u64() {
        return Ok(n);
    }

    // JSON producers sometimes emit whole numbers as floats (e.g. 3.0)
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => Ok(f as u64),
        _ => Err(BackendError::Shape(format!(
            "field `{key}` is not a non-negative integer: {value}"
        ))),
    }
}
