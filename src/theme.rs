// Theme support for the TUI
//
// A small palette mirroring the dashboard's color variables. Named themes
// use true color; "Terminal" sticks to the ANSI palette so it follows the
// user's terminal scheme.

use crate::dashboard::notify::NotificationKind;
use crate::dashboard::view::{ButtonStyle, DotState};
use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Color palette for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,

    pub primary_pink: Color,
    pub accent_green: Color,
    pub accent_red: Color,

    pub background: Color,
    pub foreground: Color,
    /// Secondary text, idle dot, disabled controls
    pub muted: Color,
    pub border: Color,
    pub border_type: BorderType,
}

impl Theme {
    /// Built-in theme names, default first
    pub const NAMES: [&'static str; 2] = ["Pink", "Terminal"];

    /// Load theme by name (case-insensitive); unknown names get the default
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "terminal" => Self::terminal(),
            "pink" => Self::pink(),
            other => {
                tracing::debug!("Unknown theme '{}', using default", other);
                Self::pink()
            }
        }
    }

    /// Default theme
    pub fn pink() -> Self {
        Self {
            name: "Pink".to_string(),
            primary_pink: Color::Rgb(0xff, 0x69, 0xb4), // hot pink
            accent_green: Color::Rgb(0x4c, 0xaf, 0x50),
            accent_red: Color::Rgb(0xf4, 0x43, 0x36),
            background: Color::Rgb(0x1a, 0x1a, 0x2e),
            foreground: Color::Rgb(0xf5, 0xf5, 0xf5),
            muted: Color::Rgb(0x8a, 0x8a, 0x9e),
            border: Color::Rgb(0xff, 0xb6, 0xd9), // light pink
            border_type: BorderType::Rounded,
        }
    }

    /// ANSI-only theme
    pub fn terminal() -> Self {
        Self {
            name: "Terminal".to_string(),
            primary_pink: Color::Magenta,
            accent_green: Color::Green,
            accent_red: Color::Red,
            background: Color::Reset,
            foreground: Color::Reset,
            muted: Color::DarkGray,
            border: Color::Gray,
            border_type: BorderType::Plain,
        }
    }

    /// Toast accent for a notification kind
    pub fn notification(&self, kind: NotificationKind) -> Color {
        match kind {
            NotificationKind::Success => self.accent_green,
            NotificationKind::Error => self.accent_red,
            NotificationKind::Info => self.primary_pink,
        }
    }

    pub fn dot(&self, dot: DotState) -> Color {
        match dot {
            DotState::Active => self.accent_green,
            DotState::Idle => self.muted,
            DotState::Error => self.accent_red,
        }
    }

    pub fn button(&self, style: ButtonStyle) -> Color {
        match style {
            ButtonStyle::Primary => self.primary_pink,
            ButtonStyle::Secondary => self.muted,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::pink()
    }
}
