// Title bar component
//
// Renders the app title with the detection status indicator on the right.

use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the title bar at the top of the screen
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let indicator = app.session.controller().indicator();

    let status = Line::from(vec![
        Span::raw(" "),
        Span::styled("●", Style::default().fg(theme.dot(indicator.dot))),
        Span::styled(
            format!(" {} ", indicator.text),
            Style::default().fg(theme.foreground),
        ),
    ])
    .right_aligned();

    let title = Paragraph::new(" 🎨 Color Detection Dashboard")
        .style(
            Style::default()
                .fg(theme.primary_pink)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.border))
                .title_top(status),
        );

    f.render_widget(title, area);
}
