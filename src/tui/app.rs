// TUI application state
//
// Holds the session (and through it the dashboard controller) plus the bits
// that only exist on screen: theme, logs panel visibility, hit map, spinner.

use super::layout::HitMap;
use crate::config::Config;
use crate::dashboard::view::ElementId;
use crate::logging::LogBuffer;
use crate::session::Session;
use crate::theme::Theme;
use std::time::{Duration, Instant};

/// Debounce duration for action keys
/// Prevents rapid-fire triggers on terminals that don't send release events
const ACTION_DEBOUNCE: Duration = Duration::from_millis(150);

const SPINNER_FRAMES: [char; 4] = ['◐', '◓', '◑', '◒'];

pub struct App {
    pub session: Session,
    pub log_buffer: LogBuffer,
    pub theme: Theme,
    pub backend_url: String,
    pub poll_interval: Duration,

    /// Whether the logs panel is shown
    pub show_logs: bool,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Element rectangles from the last frame
    pub hit_map: HitMap,

    /// When the app started (for uptime display)
    pub start_time: Instant,

    spinner_frame: usize,
    last_action_time: Option<Instant>,
}

impl App {
    pub fn new(session: Session, log_buffer: LogBuffer, config: &Config) -> Self {
        Self {
            session,
            log_buffer,
            theme: Theme::by_name(&config.theme),
            backend_url: config.backend_url.clone(),
            poll_interval: config.poll_interval,
            show_logs: false,
            should_quit: false,
            hit_map: HitMap::default(),
            start_time: Instant::now(),
            spinner_frame: 0,
            last_action_time: None,
        }
    }

    /// Debounce gate for action keys
    pub fn action_allowed(&mut self, now: Instant) -> bool {
        match self.last_action_time {
            Some(last) if now.saturating_duration_since(last) < ACTION_DEBOUNCE => false,
            _ => {
                self.last_action_time = Some(now);
                true
            }
        }
    }

    /// Toggle detection; ripple from the button center for keyboard presses
    pub fn press_toggle(&mut self, origin: Option<(u16, u16)>, now: Instant) {
        self.ripple(ElementId::ToggleBtn, origin, now);
        self.session.request_toggle();
    }

    pub fn press_refresh(&mut self, origin: Option<(u16, u16)>, now: Instant) {
        self.ripple(ElementId::RefreshBtn, origin, now);
        self.session.request_refresh();
    }

    /// Ripple on a control. Without a registered area it silently no-ops.
    fn ripple(&mut self, target: ElementId, origin: Option<(u16, u16)>, now: Instant) {
        let Some(rect) = self.hit_map.rect_of(target) else {
            return;
        };
        let origin = origin.unwrap_or((rect.width / 2, rect.height / 2));
        let size = rect.width.max(rect.height);
        self.session
            .controller_mut()
            .decorations_mut()
            .ripple(target, origin, size, now);
    }

    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
    }

    pub fn tick_animation(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn spinner_char(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame]
    }

    pub fn uptime(&self) -> String {
        let seconds = self.start_time.elapsed().as_secs();
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        let secs = seconds % 60;

        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    }
}
