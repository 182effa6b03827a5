// Views module - screen-level rendering logic
//
// One screen: title bar, dashboard content, optional logs panel, status bar,
// with toasts layered on top. Drawing also refreshes the hit map so mouse
// events can find the elements that were just rendered.

use super::app::App;
use super::layout::DashboardAreas;
use crate::backend::StatField;
use crate::dashboard::view::ElementId;
use crate::tui::components::{
    control_button, logs_panel, stat_card, status_bar, stream_panel, title_bar, toast,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;
use std::time::Instant;

const LOGS_HEIGHT: u16 = 8;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let now = Instant::now();

    let bg_block = Block::default().style(Style::default().bg(app.theme.background));
    f.render_widget(bg_block, f.area());

    let logs_height = if app.show_logs { LOGS_HEIGHT } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(logs_height),
            Constraint::Length(2),
        ])
        .split(f.area());

    title_bar::render(f, chunks[0], app);

    let areas = DashboardAreas::compute(chunks[1]);
    stream_panel::render(f, areas.stream, app);
    for field in StatField::ALL {
        stat_card::render(f, areas.card(field), app, field, now);
    }
    control_button::render(f, areas.toggle, app, ElementId::ToggleBtn, now);
    control_button::render(f, areas.refresh, app, ElementId::RefreshBtn, now);

    if app.show_logs {
        logs_panel::render(f, chunks[2], app);
    }
    status_bar::render(f, chunks[3], app);

    // Toasts sit over the content area, below the title
    let toasts = app.session.controller().notifications().drawable(now);
    toast::render(f, chunks[1], &toasts, &app.theme);

    app.hit_map.clear();
    app.hit_map.register(ElementId::StatusIndicator, chunks[0]);
    app.hit_map.register(ElementId::VideoStream, areas.stream);
    for field in StatField::ALL {
        app.hit_map.register(ElementId::for_stat(field), areas.card(field));
    }
    app.hit_map.register(ElementId::ToggleBtn, areas.toggle);
    app.hit_map.register(ElementId::RefreshBtn, areas.refresh);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dashboard::{ControllerSettings, DashboardController};
    use crate::logging::LogBuffer;
    use crate::session::Session;
    use crate::backend::{Backend, BackendError, StatsSnapshot, ToggleResponse};
    use async_trait::async_trait;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use reqwest::Url;
    use std::sync::Arc;
    use tokio::sync::watch;

    struct IdleBackend;

    #[async_trait]
    impl Backend for IdleBackend {
        async fn toggle_detection(&self) -> Result<ToggleResponse, BackendError> {
            Err(BackendError::Status(503))
        }

        async fn stats(&self) -> Result<StatsSnapshot, BackendError> {
            Err(BackendError::Status(503))
        }
    }

    fn test_app() -> App {
        let url = Url::parse("http://127.0.0.1:5000/video_feed").unwrap();
        let (source_tx, _source_rx) = watch::channel(url.clone());
        let controller = DashboardController::new(ControllerSettings::new(url));
        let (session, _rx) = Session::new(controller, Arc::new(IdleBackend), source_tx);
        App::new(session, LogBuffer::new(), &Config::default())
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_draw_shows_initial_state_and_registers_hits() {
        let mut app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();

        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Detection Active"));
        assert!(text.contains("Pause Detection"));
        assert!(text.contains("Refresh Stats"));
        assert!(text.contains("Red Objects"));

        assert!(app.hit_map.rect_of(ElementId::ToggleBtn).is_some());
        assert!(app.hit_map.rect_of(ElementId::TotalFrames).is_some());
    }

    #[test]
    fn test_draw_fits_narrow_terminal() {
        let mut app = test_app();
        app.show_logs = true;
        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();

        terminal.draw(|f| draw(f, &mut app)).unwrap();

        assert!(screen_text(&terminal).contains("System Logs"));
    }
}
