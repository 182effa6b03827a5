// Stream module - watches the backend's MJPEG video feed
//
// The probe plays the role of the page's video element: it opens the current
// source, reports `Loaded` once bytes flow, counts multipart frames, and
// reports `Failed` when the connection drops. It never retries on its own;
// the dashboard's watchdog decides when to assign a new source, which arrives
// over a `watch` channel.

mod frames;

pub use frames::FrameCounter;

use crate::events::{DashboardEvent, StreamSignal};
use futures::StreamExt;
use reqwest::Url;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Multipart boundary the backend uses between JPEG frames
pub const FRAME_BOUNDARY: &str = "--frame";

/// Minimum spacing between frame-count reports
const FRAME_REPORT_INTERVAL: Duration = Duration::from_millis(250);

/// Spawn the probe task. It ends when the source sender is dropped.
pub fn spawn_probe(
    client: reqwest::Client,
    mut source_rx: watch::Receiver<Url>,
    event_tx: mpsc::Sender<DashboardEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let source = source_rx.borrow_and_update().clone();
            let reason = watch_source(&client, &source, &event_tx).await;

            let failed = DashboardEvent::Stream(StreamSignal::Failed {
                source: source.clone(),
                reason,
            });
            if event_tx.send(failed).await.is_err() {
                break;
            }

            // Idle until the watchdog assigns a new source
            if source_rx.changed().await.is_err() {
                tracing::debug!("Stream source channel closed, stopping probe");
                break;
            }
        }
    })
}

/// Consume one source until it fails. Returns the failure reason.
async fn watch_source(
    client: &reqwest::Client,
    source: &Url,
    event_tx: &mpsc::Sender<DashboardEvent>,
) -> String {
    tracing::debug!("Opening video stream: {}", source);

    let response = match client.get(source.clone()).send().await {
        Ok(response) => response,
        Err(e) => return format!("connect failed: {e}"),
    };

    let status = response.status();
    if !status.is_success() {
        return format!("HTTP {}", status.as_u16());
    }

    let mut body = response.bytes_stream();
    let mut counter = FrameCounter::new(FRAME_BOUNDARY);
    let mut loaded = false;
    let mut last_report: Option<Instant> = None;

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => return format!("read failed: {e}"),
        };

        if !loaded {
            loaded = true;
            let signal = StreamSignal::Loaded {
                source: source.clone(),
            };
            if event_tx.send(DashboardEvent::Stream(signal)).await.is_err() {
                return "dashboard closed".to_string();
            }
        }

        if counter.feed(&chunk) > 0 {
            let due = last_report.map_or(true, |at| at.elapsed() >= FRAME_REPORT_INTERVAL);
            if due {
                last_report = Some(Instant::now());
                let signal = StreamSignal::Frames {
                    total: counter.total(),
                };
                // Frame counts are best-effort; drop them if the loop is behind
                let _ = event_tx.try_send(DashboardEvent::Stream(signal));
            }
        }
    }

    "stream ended".to_string()
}
