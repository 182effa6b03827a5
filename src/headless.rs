// Headless mode - the dashboard without a terminal UI
//
// Runs the same controller loop as the TUI: poll ticks, timer ticks, and
// background results. State changes surface through tracing on stdout.

use crate::backend::StatsSnapshot;
use crate::events::DashboardEvent;
use crate::session::Session;
use anyhow::Result;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Timer resolution for notifications, retries, and restores
const TICK_INTERVAL: Duration = Duration::from_millis(100);

pub async fn run_headless(
    mut session: Session,
    mut event_rx: mpsc::Receiver<DashboardEvent>,
    poll_interval: Duration,
) -> Result<()> {
    tracing::info!(
        poll_ms = poll_interval.as_millis() as u64,
        "Running headless, press Ctrl+C to stop"
    );

    // First poll fires one interval after start
    let mut poll = tokio::time::interval_at(tokio::time::Instant::now() + poll_interval, poll_interval);
    let mut tick = tokio::time::interval(TICK_INTERVAL);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = poll.tick() => {
                session.on_poll_tick();
            }

            _ = tick.tick() => {
                session.tick(Instant::now());
            }

            Some(event) = event_rx.recv() => {
                let was_active = session.controller().detection_active();
                let before = session.controller().stats();
                session.apply(event);
                let controller = session.controller();
                if controller.detection_active() != was_active {
                    tracing::info!(active = controller.detection_active(), "Detection state changed");
                }
                log_stats_change(before, controller.stats());
            }

            _ = &mut shutdown => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

fn log_stats_change(before: StatsSnapshot, after: StatsSnapshot) {
    if before != after {
        tracing::info!(
            red = after.red,
            yellow = after.yellow,
            total_frames = after.total_frames,
            "Stats updated"
        );
    }
}
