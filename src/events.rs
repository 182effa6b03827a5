// Events that flow from background tasks to the dashboard loop
//
// Remote calls and the stream probe run as separate tokio tasks. They never
// touch controller state directly; they report here, and the loop applies the
// event on its own task. Using an enum keeps that hand-off type-safe.

use crate::backend::{BackendError, StatsSnapshot, ToggleResponse};
use reqwest::Url;

/// Which path asked for a stats fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    /// Periodic poller; failures are logged only
    Poll,
    /// Manual refresh control; always notifies
    Refresh,
}

/// Signals from the video stream probe
#[derive(Debug, Clone, PartialEq)]
pub enum StreamSignal {
    /// Response accepted and the first bytes arrived
    Loaded { source: Url },
    /// Running total of multipart frames seen on the current source
    Frames { total: u64 },
    /// Connect error, non-2xx status, read error or end of stream
    Failed { source: Url, reason: String },
}

/// Main event type delivered to the dashboard loop
#[derive(Debug)]
pub enum DashboardEvent {
    ToggleFinished(Result<ToggleResponse, BackendError>),
    StatsFetched {
        origin: FetchOrigin,
        result: Result<StatsSnapshot, BackendError>,
    },
    Stream(StreamSignal),
}
