// Stat card component
//
// One counter per card. A changed value flashes in the primary color for the
// highlight window before the new number lands; hovering raises the card
// (thick border).

use super::formatters::format_number;
use crate::backend::StatField;
use crate::theme::Theme;
use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

pub fn render(f: &mut Frame, area: Rect, app: &App, field: StatField, now: Instant) {
    let theme = &app.theme;
    let controller = app.session.controller();
    let display = controller.displays().get(field);
    let highlighted = display.is_highlighted(now);
    let elevated = controller.decorations().is_elevated(field);

    let value_style = if highlighted {
        Style::default()
            .fg(theme.primary_pink)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default()
            .fg(theme.foreground)
            .add_modifier(Modifier::BOLD)
    };

    let (border_type, border_color) = if elevated {
        (BorderType::Thick, theme.primary_pink)
    } else {
        (theme.border_type, theme.border)
    };

    let title = Line::from(vec![
        Span::styled(" ● ", Style::default().fg(marker_color(field, theme))),
        Span::styled(
            format!("{} ", field.label()),
            Style::default().fg(theme.muted),
        ),
    ]);

    let value = Paragraph::new(Line::from(Span::styled(
        format_number(display.value(now)),
        value_style,
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(Style::default().fg(border_color))
            .title(title),
    );

    f.render_widget(value, area);
}

fn marker_color(field: StatField, theme: &Theme) -> Color {
    match field {
        StatField::Red => theme.accent_red,
        StatField::Yellow => Color::Yellow,
        StatField::TotalFrames => theme.primary_pink,
    }
}
