// Dashboard module - client state and behavior for the detection dashboard
//
// One `DashboardController` per run owns everything the dashboard knows:
// - Detection toggle: remote flip, server-reported state wins
// - Stats poller: diff-driven counter animation, silent on failure
// - Manual refresh: same fetch path, always notifies
// - Stream watchdog: error indicator, notification, bounded retry
// - Notification presenter and decorative effects
//
// The controller never spawns or sleeps. Long-running work is split into a
// `begin_*` step (busy affordance) and a `finish_*` step (apply the result),
// and everything time-based is evaluated against an explicit `Instant`.
// Both the TUI and headless loops drive it through `session::Session`.

pub mod effects;
pub mod notify;
pub mod view;
pub mod watchdog;

use crate::backend::{BackendError, StatField, StatsSnapshot, ToggleResponse};
use crate::events::{DashboardEvent, FetchOrigin, StreamSignal};
use chrono::Utc;
use effects::Decorations;
use notify::{NotificationKind, NotificationPresenter};
use reqwest::Url;
use std::time::{Duration, Instant};
use view::{ControlButton, StatDisplays, StatusIndicator};
use watchdog::StreamWatchdog;

/// Delay before the refresh control returns to its idle look
pub const REFRESH_RESTORE_DELAY: Duration = Duration::from_millis(1000);

/// Window over which the stream frame rate is measured
const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Knobs the controller takes from configuration
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub stream_url: Url,
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// When false, notifications are logged but not displayed
    pub notifications: bool,
}

impl ControllerSettings {
    pub fn new(stream_url: Url) -> Self {
        Self {
            stream_url,
            max_retries: watchdog::DEFAULT_MAX_RETRIES,
            retry_delay: watchdog::DEFAULT_RETRY_DELAY,
            notifications: true,
        }
    }
}

/// What the stream panel shows
#[derive(Debug, Clone, Default)]
pub struct StreamStatus {
    pub source: Option<Url>,
    pub connected: bool,
    pub frames: u64,
    pub fps: f64,
    sample: Option<(Instant, u64)>,
}

impl StreamStatus {
    fn loaded(&mut self, source: Url, now: Instant) {
        self.source = Some(source);
        self.connected = true;
        self.frames = 0;
        self.fps = 0.0;
        self.sample = Some((now, 0));
    }

    fn record_frames(&mut self, total: u64, now: Instant) {
        self.frames = total;
        match self.sample {
            Some((at, seen)) if total >= seen => {
                let elapsed = now.saturating_duration_since(at);
                if elapsed >= FPS_WINDOW {
                    self.fps = (total - seen) as f64 / elapsed.as_secs_f64();
                    self.sample = Some((now, total));
                }
            }
            _ => self.sample = Some((now, total)),
        }
    }

    /// A failure report for a source that has since been replaced
    fn is_stale(&self, source: &Url) -> bool {
        self.source.as_ref().is_some_and(|current| current != source)
    }

    fn failed(&mut self) {
        self.connected = false;
        self.fps = 0.0;
        self.sample = None;
    }
}

pub struct DashboardController {
    detection_active: bool,
    stats: StatsSnapshot,
    displays: StatDisplays,
    toggle_button: ControlButton,
    refresh_button: ControlButton,
    /// Label saved when the refresh control went busy
    refresh_label: Option<String>,
    /// When the refresh control returns to idle; set on completion
    refresh_restore_at: Option<Instant>,
    indicator: StatusIndicator,
    notifications: NotificationPresenter,
    notifications_enabled: bool,
    watchdog: StreamWatchdog,
    stream: StreamStatus,
    decorations: Decorations,
}

impl DashboardController {
    /// Fresh controller. Detection starts active, matching the backend default.
    pub fn new(settings: ControllerSettings) -> Self {
        let detection_active = true;
        Self {
            detection_active,
            stats: StatsSnapshot::default(),
            displays: StatDisplays::default(),
            toggle_button: ControlButton::toggle_for(detection_active),
            refresh_button: ControlButton::refresh(),
            refresh_label: None,
            refresh_restore_at: None,
            indicator: StatusIndicator::for_detection(detection_active),
            notifications: NotificationPresenter::new(),
            notifications_enabled: settings.notifications,
            watchdog: StreamWatchdog::new(
                settings.stream_url,
                settings.max_retries,
                settings.retry_delay,
            ),
            stream: StreamStatus::default(),
            decorations: Decorations::default(),
        }
    }

    // ─── Read access for renderers ──────────────────────────────────────────

    pub fn detection_active(&self) -> bool {
        self.detection_active
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats
    }

    pub fn displays(&self) -> &StatDisplays {
        &self.displays
    }

    pub fn toggle_button(&self) -> &ControlButton {
        &self.toggle_button
    }

    pub fn refresh_button(&self) -> &ControlButton {
        &self.refresh_button
    }

    pub fn indicator(&self) -> &StatusIndicator {
        &self.indicator
    }

    pub fn notifications(&self) -> &NotificationPresenter {
        &self.notifications
    }

    pub fn watchdog(&self) -> &StreamWatchdog {
        &self.watchdog
    }

    pub fn stream(&self) -> &StreamStatus {
        &self.stream
    }

    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    pub fn decorations_mut(&mut self) -> &mut Decorations {
        &mut self.decorations
    }

    /// Show a toast (or only log it when toasts are disabled)
    pub fn notify(&mut self, message: &str, kind: NotificationKind, now: Instant) {
        if self.notifications_enabled {
            self.notifications.notify(message, kind, now);
        } else {
            tracing::info!(kind = kind.as_str(), "{}", message);
        }
    }

    // ─── Detection toggle ───────────────────────────────────────────────────

    /// Enter the busy state. Returns false if the control is disabled.
    pub fn begin_toggle(&mut self) -> bool {
        if self.toggle_button.disabled {
            return false;
        }
        self.toggle_button.set_busy("Loading...");
        true
    }

    /// Apply the toggle response. The control is re-enabled on every path.
    pub fn finish_toggle(&mut self, result: Result<ToggleResponse, BackendError>, now: Instant) {
        match result {
            Ok(response) => {
                self.detection_active = response.is_active();
                self.indicator = StatusIndicator::for_detection(self.detection_active);
                tracing::info!(
                    status = %response.status,
                    active = self.detection_active,
                    "Detection toggled"
                );
                let message = if self.detection_active {
                    "Detection resumed"
                } else {
                    "Detection paused"
                };
                self.notify(message, NotificationKind::Success, now);
            }
            Err(e) => {
                tracing::error!("Error toggling detection: {}", e);
                self.notify("Failed to toggle detection", NotificationKind::Error, now);
            }
        }
        // Rebuilding from state also re-enables the control
        self.toggle_button = ControlButton::toggle_for(self.detection_active);
    }

    // ─── Stats poller and manual refresh ────────────────────────────────────

    /// Whether the periodic poller should fetch this cycle
    pub fn should_poll(&self) -> bool {
        self.detection_active
    }

    /// Diff against the held snapshot, animate changed counters, then replace it
    pub fn apply_stats(&mut self, snapshot: StatsSnapshot, now: Instant) {
        for field in StatField::ALL {
            let old = self.stats.get(field);
            let new = snapshot.get(field);
            if self.displays.get_mut(field).animate(old, new, now) {
                tracing::trace!(field = field.key(), old, new, "Counter changed");
            }
        }
        self.stats = snapshot;
    }

    /// Background poll result: apply, or log and skip the cycle
    pub fn finish_poll(&mut self, result: Result<StatsSnapshot, BackendError>, now: Instant) {
        match result {
            Ok(snapshot) => self.apply_stats(snapshot, now),
            Err(e) => tracing::warn!("Error fetching stats: {}", e),
        }
    }

    /// Enter the refresh busy state. Returns false if the control is disabled.
    pub fn begin_refresh(&mut self) -> bool {
        if self.refresh_button.disabled {
            return false;
        }
        self.refresh_label = Some(self.refresh_button.label.clone());
        self.refresh_button.set_busy("Refreshing...");
        true
    }

    /// Apply a manual refresh result and always report the outcome
    pub fn finish_refresh(&mut self, result: Result<StatsSnapshot, BackendError>, now: Instant) {
        match result {
            Ok(snapshot) => {
                self.apply_stats(snapshot, now);
                self.notify("Statistics refreshed", NotificationKind::Success, now);
            }
            Err(e) => {
                tracing::error!("Error refreshing stats: {}", e);
                self.notify("Failed to refresh statistics", NotificationKind::Error, now);
            }
        }

        self.refresh_restore_at = Some(now + REFRESH_RESTORE_DELAY);
    }

    // ─── Stream watchdog ────────────────────────────────────────────────────

    /// One handler for stream failure: indicator and toast first, then retry.
    /// Returns whether a retry was scheduled.
    pub fn on_stream_failure(&mut self, reason: &str, now: Instant) -> bool {
        tracing::warn!("Video stream failed: {}", reason);
        self.stream.failed();
        self.indicator = StatusIndicator::camera_error();
        self.notify("Camera connection lost", NotificationKind::Error, now);
        self.watchdog.on_failure(now)
    }

    /// Stream recovered; only an active detection state is re-asserted
    pub fn on_stream_load(&mut self, source: Url, now: Instant) {
        tracing::info!("Video stream loaded: {}", source);
        self.stream.loaded(source, now);
        if self.detection_active {
            self.indicator = StatusIndicator::active();
        }
    }

    // ─── Event loop integration ─────────────────────────────────────────────

    /// Apply a background result on the loop task
    pub fn handle_event(&mut self, event: DashboardEvent, now: Instant) {
        match event {
            DashboardEvent::ToggleFinished(result) => self.finish_toggle(result, now),
            DashboardEvent::StatsFetched {
                origin: FetchOrigin::Poll,
                result,
            } => self.finish_poll(result, now),
            DashboardEvent::StatsFetched {
                origin: FetchOrigin::Refresh,
                result,
            } => self.finish_refresh(result, now),
            DashboardEvent::Stream(StreamSignal::Loaded { source }) => {
                self.on_stream_load(source, now)
            }
            DashboardEvent::Stream(StreamSignal::Frames { total }) => {
                self.stream.record_frames(total, now)
            }
            DashboardEvent::Stream(StreamSignal::Failed { source, reason }) => {
                if self.stream.is_stale(&source) {
                    tracing::debug!("Ignoring failure from replaced stream source: {}", source);
                } else {
                    self.on_stream_failure(&reason, now);
                }
            }
        }
    }

    /// Advance timers. Returns stream sources to assign, in order.
    pub fn tick(&mut self, now: Instant) -> Vec<Url> {
        self.displays.settle(now);
        self.notifications.prune(now);
        self.decorations.prune(now);

        if self.refresh_restore_at.is_some_and(|at| at <= now) {
            self.refresh_restore_at = None;
            let idle = ControlButton::refresh();
            self.refresh_button = ControlButton {
                label: self.refresh_label.take().unwrap_or(idle.label.clone()),
                ..idle
            };
        }

        let sources = self.watchdog.fire_due(now, Utc::now().timestamp_millis());
        if let Some(last) = sources.last() {
            self.stream.source = Some(last.clone());
        }
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(s: &str) -> Result<ToggleResponse, BackendError> {
        Ok(ToggleResponse {
            status: s.to_string(),
        })
    }

    fn snapshot(red: u64, yellow: u64, total_frames: u64) -> StatsSnapshot {
        StatsSnapshot {
            red,
            yellow,
            total_frames,
        }
    }

    fn controller() -> DashboardController {
        let url = Url::parse("http://127.0.0.1:5000/video_feed").unwrap();
        DashboardController::new(ControllerSettings::new(url))
    }

    fn toggle(c: &mut DashboardController, result: Result<ToggleResponse, BackendError>) {
        assert!(c.begin_toggle());
        c.finish_toggle(result, Instant::now());
    }

    fn messages(c: &DashboardController) -> Vec<(String, NotificationKind)> {
        c.notifications()
            .iter()
            .map(|n| (n.message.clone(), n.kind))
            .collect()
    }

    #[test]
    fn toggle_to_active_updates_button_and_indicator() {
        let mut c = controller();

        toggle(&mut c, status("active"));

        assert!(c.detection_active());
        assert_eq!(c.toggle_button().label, "Pause Detection");
        assert_eq!(c.toggle_button().style, view::ButtonStyle::Primary);
        assert!(!c.toggle_button().disabled);
        assert_eq!(c.indicator().text, "Detection Active");
        assert_eq!(c.indicator().dot, view::DotState::Active);
        assert_eq!(
            messages(&c),
            vec![("Detection resumed".to_string(), NotificationKind::Success)]
        );
    }

    #[test]
    fn toggle_to_any_other_status_pauses() {
        let mut c = controller();

        toggle(&mut c, status("stopped"));

        assert!(!c.detection_active());
        assert_eq!(c.toggle_button().label, "Resume Detection");
        assert_eq!(c.toggle_button().icon, view::ButtonIcon::Play);
        assert_eq!(c.indicator().text, "Detection Paused");
        assert_eq!(c.indicator().dot, view::DotState::Idle);
    }

    #[test]
    fn toggle_uses_server_state_not_local_inverse() {
        // Already active locally; server still says active
        let mut c = controller();
        assert!(c.detection_active());

        toggle(&mut c, status("active"));
        assert!(c.detection_active());
    }

    #[test]
    fn failed_toggle_keeps_state_and_reenables() {
        let mut c = controller();
        toggle(&mut c, status("inactive"));
        assert!(!c.detection_active());

        toggle(&mut c, Err(BackendError::Shape("bad".into())));

        assert!(!c.detection_active(), "state unchanged on failure");
        assert!(!c.toggle_button().disabled, "control re-enabled");
        assert_eq!(c.toggle_button().label, "Resume Detection");
        assert_eq!(c.indicator().text, "Detection Paused");
        assert_eq!(
            messages(&c).last(),
            Some(&("Failed to toggle detection".to_string(), NotificationKind::Error))
        );
    }

    #[test]
    fn toggle_ignored_while_busy() {
        let mut c = controller();
        assert!(c.begin_toggle());
        assert_eq!(c.toggle_button().label, "Loading...");
        assert!(c.toggle_button().disabled);
        assert!(!c.begin_toggle());
    }

    #[test]
    fn only_changed_counters_animate() {
        let t = Instant::now();
        let mut c = controller();
        c.apply_stats(snapshot(0, 0, 100), t);
        c.tick(t + Duration::from_millis(200));

        let t2 = t + Duration::from_secs(2);
        c.apply_stats(snapshot(2, 0, 150), t2);

        let mid = t2 + Duration::from_millis(50);
        assert!(c.displays().get(StatField::Red).is_highlighted(mid));
        assert!(c.displays().get(StatField::TotalFrames).is_highlighted(mid));
        assert!(!c.displays().get(StatField::Yellow).is_highlighted(mid));

        let done = t2 + view::HIGHLIGHT_DURATION;
        assert_eq!(c.displays().get(StatField::Red).value(done), 2);
        assert_eq!(c.displays().get(StatField::TotalFrames).value(done), 150);
        assert_eq!(c.stats(), snapshot(2, 0, 150));
    }

    #[test]
    fn poller_skips_while_paused() {
        let mut c = controller();
        assert!(c.should_poll());

        toggle(&mut c, status("inactive"));
        assert!(!c.should_poll());

        toggle(&mut c, status("active"));
        assert!(c.should_poll());
    }

    #[test]
    fn poll_failure_is_silent() {
        let t = Instant::now();
        let mut c = controller();
        c.apply_stats(snapshot(4, 5, 6), t);

        c.handle_event(
            DashboardEvent::StatsFetched {
                origin: FetchOrigin::Poll,
                result: Err(BackendError::Status(503)),
            },
            t,
        );
        assert_eq!(c.stats(), snapshot(4, 5, 6));
        assert!(c.notifications().is_empty(), "no toast for background failures");
    }

    #[test]
    fn refresh_always_notifies_and_restores() {
        let t = Instant::now();
        let mut c = controller();
        toggle(&mut c, status("inactive"));

        // Refresh works even while detection is paused
        assert!(c.begin_refresh());
        assert_eq!(c.refresh_button().label, "Refreshing...");
        c.finish_refresh(Ok(snapshot(1, 2, 3)), t);
        assert_eq!(c.stats(), snapshot(1, 2, 3));
        assert!(c.refresh_button().disabled, "stays busy until restore delay");
        assert!(!c.begin_refresh());

        c.tick(t + REFRESH_RESTORE_DELAY - Duration::from_millis(1));
        assert!(c.refresh_button().disabled);
        c.tick(t + REFRESH_RESTORE_DELAY);
        assert!(!c.refresh_button().disabled);
        assert_eq!(c.refresh_button().label, "Refresh Stats");

        let t2 = t + REFRESH_RESTORE_DELAY;
        assert!(c.begin_refresh());
        c.finish_refresh(Err(BackendError::Status(500)), t2);
        assert_eq!(c.stats(), snapshot(1, 2, 3), "failed refresh keeps counters");

        let kinds: Vec<_> = messages(&c).into_iter().skip(1).collect();
        assert_eq!(
            kinds,
            vec![
                ("Statistics refreshed".to_string(), NotificationKind::Success),
                ("Failed to refresh statistics".to_string(), NotificationKind::Error),
            ]
        );
    }

    #[test]
    fn last_stats_response_wins() {
        let t = Instant::now();
        let mut c = controller();
        c.handle_event(
            DashboardEvent::StatsFetched {
                origin: FetchOrigin::Refresh,
                result: Ok(snapshot(9, 9, 9)),
            },
            t,
        );
        c.handle_event(
            DashboardEvent::StatsFetched {
                origin: FetchOrigin::Poll,
                result: Ok(snapshot(1, 1, 1)),
            },
            t,
        );
        assert_eq!(c.stats(), snapshot(1, 1, 1));
    }

    #[test]
    fn four_stream_failures_three_reassignments() {
        let mut now = Instant::now();
        let mut c = controller();
        let mut reassigned = Vec::new();
        let mut error_toasts = 0;

        for _ in 0..4 {
            c.on_stream_failure("connection refused", now);
            // Count each toast before later ticks prune it
            let newest = c.notifications().iter().last().map(|n| (n.message.clone(), n.kind));
            if newest == Some(("Camera connection lost".to_string(), NotificationKind::Error)) {
                error_toasts += 1;
            }
            now += watchdog::DEFAULT_RETRY_DELAY;
            reassigned.extend(c.tick(now));
        }

        assert_eq!(reassigned.len(), 3);
        assert!(reassigned
            .iter()
            .all(|u| u.path() == "/video_feed" && u.query().is_some_and(|q| q.starts_with("t="))));
        assert_eq!(error_toasts, 4, "every failure notifies, retried or not");
        assert_eq!(c.indicator().text, "Camera Error");
        assert_eq!(c.watchdog().counter().count(), 3);
    }

    #[test]
    fn every_failure_notifies() {
        let t = Instant::now();
        let mut c = controller();
        for _ in 0..4 {
            c.on_stream_failure("eof", t);
        }
        assert_eq!(
            c.notifications()
                .iter()
                .filter(|n| n.message == "Camera connection lost")
                .count(),
            4
        );
    }

    #[test]
    fn failure_from_replaced_source_is_ignored() {
        let t = Instant::now();
        let mut c = controller();
        let base = c.watchdog().base().clone();

        c.handle_event(
            DashboardEvent::Stream(StreamSignal::Failed {
                source: base.clone(),
                reason: "eof".to_string(),
            }),
            t,
        );
        let retry = c.tick(t + watchdog::DEFAULT_RETRY_DELAY);
        assert_eq!(retry.len(), 1);
        let errors_before = c.notifications().len();

        // A late report for the old source arrives after the reassignment
        c.handle_event(
            DashboardEvent::Stream(StreamSignal::Failed {
                source: base,
                reason: "eof".to_string(),
            }),
            t + watchdog::DEFAULT_RETRY_DELAY,
        );
        assert_eq!(c.notifications().len(), errors_before);
        assert_eq!(c.watchdog().counter().count(), 1);

        // The current source failing still counts
        c.handle_event(
            DashboardEvent::Stream(StreamSignal::Failed {
                source: retry[0].clone(),
                reason: "eof".to_string(),
            }),
            t + watchdog::DEFAULT_RETRY_DELAY,
        );
        assert_eq!(c.notifications().len(), errors_before + 1);
    }

    #[test]
    fn stream_load_restores_only_active_indicator() {
        let source = Url::parse("http://127.0.0.1:5000/video_feed?t=1").unwrap();
        let t = Instant::now();

        let mut active = controller();
        active.on_stream_failure("eof", t);
        active.on_stream_load(source.clone(), t);
        assert_eq!(active.indicator(), &StatusIndicator::active());
        assert!(active.stream().connected);

        let mut paused = controller();
        toggle(&mut paused, status("inactive"));
        paused.on_stream_failure("eof", t);
        paused.on_stream_load(source, t);
        assert_eq!(paused.indicator(), &StatusIndicator::camera_error());
    }

    #[test]
    fn disabled_notifications_are_not_displayed() {
        let url = Url::parse("http://127.0.0.1:5000/video_feed").unwrap();
        let mut settings = ControllerSettings::new(url);
        settings.notifications = false;
        let mut c = DashboardController::new(settings);

        c.on_stream_failure("eof", Instant::now());
        assert!(c.notifications().is_empty());
    }

    #[test]
    fn frame_rate_measured_over_window() {
        let t = Instant::now();
        let source = Url::parse("http://127.0.0.1:5000/video_feed").unwrap();
        let mut c = controller();
        c.on_stream_load(source, t);
        c.handle_event(
            DashboardEvent::Stream(StreamSignal::Frames { total: 15 }),
            t + Duration::from_millis(500),
        );
        assert_eq!(c.stream().fps, 0.0);

        c.handle_event(
            DashboardEvent::Stream(StreamSignal::Frames { total: 30 }),
            t + Duration::from_secs(1),
        );
        assert!((c.stream().fps - 30.0).abs() < 0.01);
        assert_eq!(c.stream().frames, 30);
    }
}
