// Control button component
//
// Draws a `ControlButton` from the view model: icon plus label, primary or
// secondary color, dimmed while disabled. Live ripples are painted over the
// button as an expanding, fading band around the click point.

use crate::dashboard::view::{ButtonIcon, ControlButton, ElementId};
use crate::tui::app::App;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

pub fn render(f: &mut Frame, area: Rect, app: &App, id: ElementId, now: Instant) {
    let theme = &app.theme;
    let controller = app.session.controller();
    let button = match id {
        ElementId::ToggleBtn => controller.toggle_button(),
        ElementId::RefreshBtn => controller.refresh_button(),
        _ => return,
    };

    let color = if button.disabled {
        theme.muted
    } else {
        theme.button(button.style)
    };

    let mut text_style = Style::default().fg(color).add_modifier(Modifier::BOLD);
    if button.disabled {
        text_style = text_style.add_modifier(Modifier::DIM);
    }

    let widget = Paragraph::new(label_text(button, app.spinner_char()))
        .alignment(Alignment::Center)
        .style(text_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(widget, area);

    for ripple in controller.decorations().ripples_on(id) {
        if let Some(frame) = ripple.frame(now) {
            paint_ripple(f.buffer_mut(), area, ripple.origin, ripple.size, frame.scale, frame.opacity);
        }
    }
}

/// "<icon> <label>", with the spinner animated by the caller's frame
fn label_text(button: &ControlButton, spinner: char) -> String {
    match button.icon {
        ButtonIcon::Spinner => format!("{} {}", spinner, button.label),
        icon => format!("{} {}", icon.glyph(), button.label),
    }
}

/// Reverse the cells within the ripple radius; fade by dimming once past half
fn paint_ripple(
    buf: &mut Buffer,
    area: Rect,
    origin: (u16, u16),
    size: u16,
    scale: f32,
    opacity: f32,
) {
    if opacity <= 0.0 {
        return;
    }

    let radius = scale * f32::from(size) / 2.0;
    let modifier = if opacity > 0.5 {
        Modifier::REVERSED
    } else {
        Modifier::DIM
    };

    for row in 0..area.height {
        for col in 0..area.width {
            let dx = f32::from(col) - f32::from(origin.0);
            // Cells are roughly twice as tall as wide
            let dy = (f32::from(row) - f32::from(origin.1)) * 2.0;
            if (dx * dx + dy * dy).sqrt() <= radius {
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.modifier.insert(modifier);
                }
            }
        }
    }
}
