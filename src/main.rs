// colorwatch - terminal dashboard for a color detection camera
//
// Mirrors the camera's web dashboard in a terminal: live stream status,
// detection counters, a detection toggle and a manual refresh.
//
// Architecture:
// - Backend (reqwest): typed client for /toggle_detection and /stats
// - Stream probe: watches the MJPEG feed, reports load/failure/frames
// - Dashboard controller: all client state, driven by explicit time
// - Session: spawns remote calls, results return over an mpsc channel
// - TUI (ratatui) or headless loop: owns the session and drives ticks

mod backend;
mod cli;
mod config;
mod dashboard;
mod events;
mod headless;
mod logging;
mod session;
mod stream;
mod theme;
mod tui;

use anyhow::{Context, Result};
use backend::HttpBackend;
use clap::Parser;
use config::Config;
use dashboard::{ControllerSettings, DashboardController};
use logging::{LogBuffer, Sink};
use session::Session;
use std::sync::Arc;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env()?;
    cli.apply(&mut config);

    // Subcommands run once and exit
    if cli::handle_command(&cli, &config).await? {
        return Ok(());
    }

    // In TUI mode: capture logs to buffer (prevents garbling the display)
    // In headless mode: output logs to stdout
    let log_buffer = LogBuffer::new();
    let sink = if config.headless {
        Sink::Stdout
    } else {
        Sink::Tui(log_buffer.clone())
    };
    // The guard must be kept alive for the duration of the program to ensure logs flush
    let _file_guard = logging::init(&config.logging, sink);

    tracing::info!(
        version = config::VERSION,
        backend = %config.backend_url,
        "Starting colorwatch"
    );

    let backend = HttpBackend::new(&config.backend_url, config.request_timeout)?;
    let stream_url = backend
        .endpoint(&config.stream_path)
        .context("Invalid stream path")?;

    let settings = ControllerSettings {
        max_retries: config.watchdog.max_retries,
        retry_delay: config.watchdog.retry_delay,
        notifications: config.notifications.enabled,
        ..ControllerSettings::new(stream_url.clone())
    };
    let controller = DashboardController::new(settings);

    // The stream client has no request timeout: the feed never ends on its own
    let stream_client = reqwest::Client::new();
    let (source_tx, source_rx) = watch::channel(stream_url);
    let (session, event_rx) = Session::new(controller, Arc::new(backend), source_tx);
    let probe = stream::spawn_probe(stream_client, source_rx, session.event_sender());

    let result = if config.headless {
        headless::run_headless(session, event_rx, config.poll_interval).await
    } else {
        tui::run_tui(session, event_rx, log_buffer, &config).await
    };

    probe.abort();
    tracing::info!("colorwatch stopped");

    result
}
