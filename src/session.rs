// Session - wires the dashboard controller to the async world
//
// The controller is synchronous and owned by the loop task. `Session` spawns
// the remote calls it asks for, and each result comes back through the
// event channel to be applied on that same task. Stream sources chosen by
// the watchdog are pushed to the probe over a `watch` channel.

use crate::backend::Backend;
use crate::dashboard::DashboardController;
use crate::events::{DashboardEvent, FetchOrigin};
use reqwest::Url;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};

/// Capacity of the dashboard event channel
const EVENT_BUFFER: usize = 256;

pub struct Session {
    controller: DashboardController,
    backend: Arc<dyn Backend>,
    event_tx: mpsc::Sender<DashboardEvent>,
    source_tx: watch::Sender<Url>,
}

impl Session {
    /// Build a session and the receiver its results arrive on
    pub fn new(
        controller: DashboardController,
        backend: Arc<dyn Backend>,
        source_tx: watch::Sender<Url>,
    ) -> (Self, mpsc::Receiver<DashboardEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let session = Self {
            controller,
            backend,
            event_tx,
            source_tx,
        };
        (session, event_rx)
    }

    pub fn controller(&self) -> &DashboardController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut DashboardController {
        &mut self.controller
    }

    /// Sender for producers outside the session (the stream probe)
    pub fn event_sender(&self) -> mpsc::Sender<DashboardEvent> {
        self.event_tx.clone()
    }

    /// Flip detection on the backend. No-op while a toggle is in flight.
    pub fn request_toggle(&mut self) -> bool {
        if !self.controller.begin_toggle() {
            return false;
        }

        let backend = self.backend.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.toggle_detection().await;
            let _ = tx.send(DashboardEvent::ToggleFinished(result)).await;
        });
        true
    }

    /// Manual stats refresh. No-op while a refresh is in flight.
    pub fn request_refresh(&mut self) -> bool {
        if !self.controller.begin_refresh() {
            return false;
        }
        self.spawn_stats(FetchOrigin::Refresh);
        true
    }

    /// Periodic poll; skipped while detection is paused
    pub fn on_poll_tick(&mut self) -> bool {
        if !self.controller.should_poll() {
            tracing::trace!("Detection paused, skipping stats poll");
            return false;
        }
        self.spawn_stats(FetchOrigin::Poll);
        true
    }

    fn spawn_stats(&self, origin: FetchOrigin) {
        let backend = self.backend.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.stats().await;
            let _ = tx.send(DashboardEvent::StatsFetched { origin, result }).await;
        });
    }

    /// Apply a completed call or stream signal
    pub fn apply(&mut self, event: DashboardEvent) {
        self.controller.handle_event(event, Instant::now());
    }

    /// Advance timers and hand any new stream source to the probe
    pub fn tick(&mut self, now: Instant) {
        for source in self.controller.tick(now) {
            tracing::info!("Reconnecting video stream: {}", source);
            self.source_tx.send_replace(source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, StatsSnapshot, ToggleResponse};
    use crate::dashboard::watchdog::DEFAULT_RETRY_DELAY;
    use crate::dashboard::notify::NotificationKind;
    use crate::dashboard::{ControllerSettings, REFRESH_RESTORE_DELAY};
    use crate::events::StreamSignal;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Backend that always answers the same way
    struct FixedBackend {
        status: &'static str,
        /// None makes every stats call fail
        stats: Option<StatsSnapshot>,
        calls: AtomicUsize,
    }

    impl FixedBackend {
        fn new(status: &'static str, stats: StatsSnapshot) -> Arc<Self> {
            Arc::new(Self {
                status,
                stats: Some(stats),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing_stats() -> Arc<Self> {
            Arc::new(Self {
                status: "active",
                stats: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Backend for FixedBackend {
        async fn toggle_detection(&self) -> Result<ToggleResponse, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ToggleResponse {
                status: self.status.to_string(),
            })
        }

        async fn stats(&self) -> Result<StatsSnapshot, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.stats.ok_or(BackendError::Status(500))
        }
    }

    fn session_with(
        backend: Arc<FixedBackend>,
    ) -> (Session, mpsc::Receiver<DashboardEvent>, watch::Receiver<Url>) {
        let url = Url::parse("http://127.0.0.1:5000/video_feed").unwrap();
        let (source_tx, source_rx) = watch::channel(url.clone());
        let controller = DashboardController::new(ControllerSettings::new(url));
        let (session, rx) = Session::new(controller, backend, source_tx);
        (session, rx, source_rx)
    }

    async fn recv(rx: &mut mpsc::Receiver<DashboardEvent>) -> DashboardEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("result within 5s")
            .expect("channel open")
    }

    #[tokio::test]
    async fn test_toggle_round_trip_through_channel() {
        let backend = FixedBackend::new("inactive", StatsSnapshot::default());
        let (mut session, mut rx, _source_rx) = session_with(backend.clone());

        assert!(session.request_toggle());
        // Second press while busy is ignored
        assert!(!session.request_toggle());
        assert!(session.controller().toggle_button().disabled);

        let event = recv(&mut rx).await;
        session.apply(event);

        assert!(!session.controller().detection_active());
        assert!(!session.controller().toggle_button().disabled);
        assert_eq!(session.controller().toggle_button().label, "Resume Detection");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_poll_tick_skipped_while_paused() {
        let backend = FixedBackend::new("inactive", StatsSnapshot::default());
        let (mut session, mut rx, _source_rx) = session_with(backend.clone());

        session.request_toggle();
        let event = recv(&mut rx).await;
        session.apply(event);
        let calls_after_toggle = backend.calls.load(Ordering::SeqCst);

        assert!(!session.on_poll_tick());
        assert_eq!(backend.calls.load(Ordering::SeqCst), calls_after_toggle);
    }

    #[tokio::test]
    async fn test_poll_applies_stats() {
        let stats = StatsSnapshot {
            red: 4,
            yellow: 2,
            total_frames: 90,
        };
        let backend = FixedBackend::new("active", stats);
        let (mut session, mut rx, _source_rx) = session_with(backend);

        assert!(session.on_poll_tick());
        let event = recv(&mut rx).await;
        session.apply(event);

        assert_eq!(session.controller().stats(), stats);
        // Poll is silent
        assert!(session.controller().notifications().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_round_trip_notifies_and_restores() {
        let stats = StatsSnapshot {
            red: 1,
            yellow: 2,
            total_frames: 3,
        };
        let backend = FixedBackend::new("inactive", stats);
        let (mut session, mut rx, _source_rx) = session_with(backend.clone());

        assert!(session.request_refresh());
        assert!(!session.request_refresh(), "ignored while busy");
        assert_eq!(session.controller().refresh_button().label, "Refreshing...");

        let event = recv(&mut rx).await;
        session.apply(event);
        assert_eq!(session.controller().stats(), stats);
        assert!(session
            .controller()
            .notifications()
            .iter()
            .any(|n| n.message == "Statistics refreshed"));
        assert!(session.controller().refresh_button().disabled);

        session.tick(Instant::now() + REFRESH_RESTORE_DELAY);
        assert!(!session.controller().refresh_button().disabled);
        assert_eq!(session.controller().refresh_button().label, "Refresh Stats");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_notifies_error() {
        let (mut session, mut rx, _source_rx) = session_with(FixedBackend::failing_stats());

        assert!(session.request_refresh());
        let event = recv(&mut rx).await;
        session.apply(event);

        let last = session.controller().notifications().iter().last().cloned();
        assert_eq!(
            last.map(|n| (n.message, n.kind)),
            Some(("Failed to refresh statistics".to_string(), NotificationKind::Error))
        );
        assert_eq!(session.controller().stats(), StatsSnapshot::default());
    }

    #[tokio::test]
    async fn test_failed_poll_is_silent() {
        let (mut session, mut rx, _source_rx) = session_with(FixedBackend::failing_stats());

        assert!(session.on_poll_tick());
        let event = recv(&mut rx).await;
        session.apply(event);

        assert!(session.controller().notifications().is_empty());
    }

    #[tokio::test]
    async fn test_tick_pushes_retry_source_to_probe() {
        let backend = FixedBackend::new("active", StatsSnapshot::default());
        let (mut session, _rx, mut source_rx) = session_with(backend);
        source_rx.borrow_and_update();

        let source = session.controller().watchdog().base().clone();
        session.apply(DashboardEvent::Stream(StreamSignal::Failed {
            source,
            reason: "stream ended".to_string(),
        }));

        let start = Instant::now();
        session.tick(start);
        assert!(!source_rx.has_changed().unwrap());

        session.tick(start + DEFAULT_RETRY_DELAY + Duration::from_millis(10));
        assert!(source_rx.has_changed().unwrap());
        let retry = source_rx.borrow_and_update().clone();
        assert!(retry.query_pairs().any(|(k, _)| k == "t"));
    }
}
