// Status bar component
//
// Renders session info at the bottom: uptime, backend, poll cadence, stream
// retries, and key hints.

use super::formatters::format_compact_number;
use crate::tui::app::App;
use crate::tui::layout::Breakpoint;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Adapts to terminal width:
/// - Wide: Full format with labels and key hints
/// - Narrow: Compact icon-based format
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let controller = app.session.controller();
    let retries = controller.watchdog().counter();
    let frames = format_compact_number(controller.stream().frames);
    let bp = Breakpoint::from_width(area.width);

    let status_text = if !bp.at_least(Breakpoint::Wide) {
        format!(
            " {} │ 🎞 {} │ ↻ {}/{} │ t r l q",
            app.uptime(),
            frames,
            retries.count(),
            retries.max(),
        )
    } else {
        format!(
            " {} │ {} │ poll {}ms │ 🎞 {} frames │ retries {}/{} │ t:toggle  r:refresh  l:logs  q:quit",
            app.uptime(),
            app.backend_url,
            app.poll_interval.as_millis(),
            frames,
            retries.count(),
            retries.max(),
        )
    };

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(app.theme.muted))
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}
