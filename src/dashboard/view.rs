// View model - what the dashboard currently shows
//
// These types are the terminal counterpart of the page elements the
// controller writes to: the two control buttons, the status indicator and the
// three counters. They hold no terminal types so the controller stays
// testable without a frame.

use crate::backend::StatField;
use std::time::{Duration, Instant};

/// Length of the counter highlight; the new value lands when it ends
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(150);

/// Fixed element ids the controller binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    ToggleBtn,
    RefreshBtn,
    StatusIndicator,
    VideoStream,
    RedCount,
    YellowCount,
    TotalFrames,
}

impl ElementId {
    pub fn dom_id(&self) -> &'static str {
        match self {
            ElementId::ToggleBtn => "toggle-btn",
            ElementId::RefreshBtn => "refresh-btn",
            ElementId::StatusIndicator => "status-indicator",
            ElementId::VideoStream => "video-stream",
            ElementId::RedCount => "red-count",
            ElementId::YellowCount => "yellow-count",
            ElementId::TotalFrames => "total-frames",
        }
    }

    pub fn for_stat(field: StatField) -> Self {
        match field {
            StatField::Red => ElementId::RedCount,
            StatField::Yellow => ElementId::YellowCount,
            StatField::TotalFrames => ElementId::TotalFrames,
        }
    }

    /// Whether this element is a control button (ripple target)
    pub fn is_control(&self) -> bool {
        matches!(self, ElementId::ToggleBtn | ElementId::RefreshBtn)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonIcon {
    Pause,
    Play,
    Refresh,
    /// Busy affordance; the renderer animates it
    Spinner,
}

impl ButtonIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            ButtonIcon::Pause => "⏸️",
            ButtonIcon::Play => "▶️",
            ButtonIcon::Refresh => "🔄",
            ButtonIcon::Spinner => "◐",
        }
    }
}

/// A clickable control with a label, icon and enabled flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlButton {
    pub label: String,
    pub icon: ButtonIcon,
    pub style: ButtonStyle,
    pub disabled: bool,
}

impl ControlButton {
    /// Toggle button reflecting the given detection state
    pub fn toggle_for(active: bool) -> Self {
        if active {
            Self {
                label: "Pause Detection".to_string(),
                icon: ButtonIcon::Pause,
                style: ButtonStyle::Primary,
                disabled: false,
            }
        } else {
            Self {
                label: "Resume Detection".to_string(),
                icon: ButtonIcon::Play,
                style: ButtonStyle::Secondary,
                disabled: false,
            }
        }
    }

    pub fn refresh() -> Self {
        Self {
            label: "Refresh Stats".to_string(),
            icon: ButtonIcon::Refresh,
            style: ButtonStyle::Secondary,
            disabled: false,
        }
    }

    /// Switch into the busy state: spinner, busy label, disabled
    pub fn set_busy(&mut self, label: &str) {
        self.label = label.to_string();
        self.icon = ButtonIcon::Spinner;
        self.disabled = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotState {
    Active,
    Idle,
    Error,
}

/// The status dot plus its caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    pub dot: DotState,
    pub text: String,
}

impl StatusIndicator {
    pub fn active() -> Self {
        Self {
            dot: DotState::Active,
            text: "Detection Active".to_string(),
        }
    }

    pub fn paused() -> Self {
        Self {
            dot: DotState::Idle,
            text: "Detection Paused".to_string(),
        }
    }

    pub fn camera_error() -> Self {
        Self {
            dot: DotState::Error,
            text: "Camera Error".to_string(),
        }
    }

    pub fn for_detection(active: bool) -> Self {
        if active {
            Self::active()
        } else {
            Self::paused()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Highlight {
    started: Instant,
    value: u64,
}

/// A counter display with its in-flight highlight animation
///
/// The shown text switches to the new value only once the highlight has run
/// for `HIGHLIGHT_DURATION`; reads take `now` so no timer task is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatDisplay {
    shown: u64,
    highlight: Option<Highlight>,
}

impl StatDisplay {
    /// Start a highlight if the value changed. Returns whether it animates.
    pub fn animate(&mut self, old: u64, new: u64, now: Instant) -> bool {
        if old == new {
            return false;
        }
        self.highlight = Some(Highlight {
            started: now,
            value: new,
        });
        true
    }

    /// Value currently rendered
    pub fn value(&self, now: Instant) -> u64 {
        match self.highlight {
            Some(h) if now >= h.started + HIGHLIGHT_DURATION => h.value,
            _ => self.shown,
        }
    }

    pub fn is_highlighted(&self, now: Instant) -> bool {
        self.highlight
            .is_some_and(|h| now < h.started + HIGHLIGHT_DURATION)
    }

    /// Fold a finished highlight into the shown value
    pub fn settle(&mut self, now: Instant) {
        if let Some(h) = self.highlight {
            if now >= h.started + HIGHLIGHT_DURATION {
                self.shown = h.value;
                self.highlight = None;
            }
        }
    }
}

/// The three counter displays, addressed by field
#[derive(Debug, Clone, Default)]
pub struct StatDisplays {
    red: StatDisplay,
    yellow: StatDisplay,
    total_frames: StatDisplay,
}

impl StatDisplays {
    pub fn get(&self, field: StatField) -> &StatDisplay {
        match field {
            StatField::Red => &self.red,
            StatField::Yellow => &self.yellow,
            StatField::TotalFrames => &self.total_frames,
        }
    }

    pub fn get_mut(&mut self, field: StatField) -> &mut StatDisplay {
        match field {
            StatField::Red => &mut self.red,
            StatField::Yellow => &mut self.yellow,
            StatField::TotalFrames => &mut self.total_frames,
        }
    }

    pub fn settle(&mut self, now: Instant) {
        for field in StatField::ALL {
            self.get_mut(field).settle(now);
        }
    }
}
