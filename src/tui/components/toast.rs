//! Toast notification component
//!
//! Draws the presenter's live notifications as overlays anchored top-right.
//! Toasts slide in from the right edge and back out; concurrent ones share
//! the anchor and overlap, newest on top.

use crate::dashboard::notify::{Notification, NotificationKind};
use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Gap between the toast and the area edges
const MARGIN: u16 = 2;
const HEIGHT: u16 = 3;

fn icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "✓",
        NotificationKind::Error => "✗",
        NotificationKind::Info => "ℹ",
    }
}

/// Toast rectangle for a slide `offset` (0.0 in place, 1.0 off-screen).
/// None when nothing of it would be visible.
pub fn toast_rect(area: Rect, text_width: u16, offset: f32) -> Option<Rect> {
    // Text plus two cells of padding and the borders
    let width = text_width.saturating_add(4).min(area.width.saturating_sub(MARGIN * 2));
    if width < 3 || area.height < HEIGHT + 1 {
        return None;
    }

    let resting_x = area.right().saturating_sub(width + MARGIN);
    let travel = f32::from(width + MARGIN);
    let shift = (travel * offset.clamp(0.0, 1.0)).round() as u16;
    let x = resting_x.saturating_add(shift);

    let visible = width.min(area.right().saturating_sub(x));
    if visible < 3 {
        return None;
    }

    Some(Rect::new(x, area.y + 1, visible, HEIGHT))
}

/// Render every drawable toast, oldest first
pub fn render(f: &mut Frame, area: Rect, toasts: &[(&Notification, f32)], theme: &Theme) {
    for (notification, offset) in toasts {
        render_one(f, area, notification, *offset, theme);
    }
}

fn render_one(f: &mut Frame, area: Rect, notification: &Notification, offset: f32, theme: &Theme) {
    let text = format!("{} {}", icon(notification.kind), notification.message);
    let text_width = u16::try_from(text.width()).unwrap_or(u16::MAX);

    let Some(toast_area) = toast_rect(area, text_width, offset) else {
        return;
    };

    let accent = theme.notification(notification.kind);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(theme.background));

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .block(block);

    // Clear the area first so toast appears on top
    f.render_widget(Clear, toast_area);
    f.render_widget(paragraph, toast_area);
}
