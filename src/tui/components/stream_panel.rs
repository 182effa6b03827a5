// Stream panel component
//
// Stands in for the video element: shows which source is being watched,
// whether frames are flowing, and the watchdog's retry budget.

use super::formatters::format_number;
use crate::dashboard::view::DotState;
use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let controller = app.session.controller();
    let stream = controller.stream();
    let watchdog = controller.watchdog();
    let retries = watchdog.counter();

    let source = stream
        .source
        .as_ref()
        .unwrap_or_else(|| watchdog.base())
        .to_string();

    let state = if stream.connected {
        Span::styled(
            "● LIVE",
            Style::default()
                .fg(theme.accent_green)
                .add_modifier(Modifier::BOLD),
        )
    } else if retries.count() > 0 || controller.indicator().dot == DotState::Error {
        Span::styled(
            "📷 Camera Error",
            Style::default()
                .fg(theme.accent_red)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            format!("{} Connecting...", app.spinner_char()),
            Style::default().fg(theme.muted),
        )
    };

    let label = Style::default().fg(theme.muted);
    let value = Style::default().fg(theme.foreground);

    let mut lines = vec![
        Line::from(state),
        Line::default(),
        Line::from(vec![Span::styled("Source   ", label), Span::styled(source, value)]),
    ];

    if stream.connected {
        lines.push(Line::from(vec![
            Span::styled("Frames   ", label),
            Span::styled(format_number(stream.frames), value),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Rate     ", label),
            Span::styled(format!("{:.1} fps", stream.fps), value),
        ]));
    }

    let retry_style = if retries.is_exhausted() {
        Style::default().fg(theme.accent_red)
    } else {
        value
    };
    lines.push(Line::from(vec![
        Span::styled("Retries  ", label),
        Span::styled(format!("{}/{}", retries.count(), retries.max()), retry_style),
    ]));

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.border))
                .title(" 📹 Live Feed "),
        );

    f.render_widget(panel, area);
}
