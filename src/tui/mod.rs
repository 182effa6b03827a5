// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard and mouse input, poll and timer ticks)
// - Rendering the dashboard
// - Applying background results from the event channel

pub mod app;
pub mod components;
pub mod layout;
pub mod views;

use crate::config::Config;
use crate::dashboard::view::ElementId;
use crate::events::DashboardEvent;
use crate::logging::LogBuffer;
use crate::session::Session;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Redraw and timer cadence
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Run the TUI
///
/// Sets up the terminal, runs the event loop, and restores the terminal
/// when done, even if the loop failed.
pub async fn run_tui(
    session: Session,
    mut event_rx: mpsc::Receiver<DashboardEvent>,
    log_buffer: LogBuffer,
    config: &Config,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(session, log_buffer, config);

    let result = run_event_loop(&mut terminal, &mut app, &mut event_rx, config.poll_interval).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on four sources with tokio::select!:
/// 1. Keyboard and mouse input
/// 2. Timer ticks (animations, toasts, retries, redraw)
/// 3. Stats poll ticks
/// 4. Background results (remote calls and stream signals)
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::Receiver<DashboardEvent>,
    poll_interval: Duration,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(TICK_INTERVAL);
    // First poll fires one interval after start
    let mut poll_interval = tokio::time::interval_at(
        tokio::time::Instant::now() + poll_interval,
        poll_interval,
    );

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => handle_key_event(app, key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            _ = tick_interval.tick() => {
                app.tick_animation();
                app.session.tick(Instant::now());
            }

            _ = poll_interval.tick() => {
                app.session.on_poll_tick();
            }

            Some(event) = event_rx.recv() => {
                app.session.apply(event);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    let now = Instant::now();
    match key_event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }
        KeyCode::Char('t') | KeyCode::Char('T') | KeyCode::Char(' ') => {
            if app.action_allowed(now) {
                app.press_toggle(None, now);
            }
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            if app.action_allowed(now) {
                app.press_refresh(None, now);
            }
        }
        KeyCode::Char('l') | KeyCode::Char('L') => {
            if app.action_allowed(now) {
                app.toggle_logs();
            }
        }
        _ => {}
    }
}

/// Handle mouse input: clicks on controls, hover over stat cards
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    let (column, row) = (mouse_event.column, mouse_event.row);
    let now = Instant::now();

    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some((id, rect)) = app.hit_map.element_at(column, row) else {
                return;
            };
            tracing::trace!(element = id.dom_id(), column, row, "Click");
            let origin = Some((column - rect.x, row - rect.y));
            match id {
                ElementId::ToggleBtn => app.press_toggle(origin, now),
                ElementId::RefreshBtn => app.press_refresh(origin, now),
                _ => {}
            }
        }
        MouseEventKind::Moved => {
            let card = app.hit_map.card_at(column, row);
            let decorations = app.session.controller_mut().decorations_mut();
            if decorations.hovered() != card {
                tracing::trace!(card = card.map(|c| c.key()), "Hover");
                decorations.set_hovered(card);
            }
        }
        _ => {}
    }
}
