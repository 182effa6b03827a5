// CLI module - command-line argument parsing and handlers
//
// Flags override the resolved configuration for a dashboard run.
// Subcommands do one thing and exit:
// - config --show|--path|--reset: inspect or regenerate the config file
// - toggle: flip detection once and print the new state
// - stats: fetch the counters once and print them

use crate::backend::{Backend, HttpBackend, StatField};
use crate::config::{Config, VERSION};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;

/// colorwatch - terminal dashboard for a color detection camera
#[derive(Parser, Debug)]
#[command(name = "colorwatch")]
#[command(version = VERSION)]
#[command(about = "Terminal dashboard for a color detection camera", long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides config and COLORWATCH_BACKEND_URL)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Run without the terminal UI, logging to stdout
    #[arg(long)]
    pub headless: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,
    },
    /// Toggle detection once and print the new state
    Toggle,
    /// Fetch statistics once and print them
    Stats,
}

impl Cli {
    /// Apply flag overrides on top of env/file/default config
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        if self.headless {
            config.headless = true;
        }
    }
}

/// Handle a subcommand. Returns true if one ran (exit after).
pub async fn handle_command(cli: &Cli, config: &Config) -> Result<bool> {
    match &cli.command {
        Some(Commands::Config { show, path, reset }) => {
            if *path {
                handle_config_path()?;
            } else if *show {
                handle_config_show(config);
            } else if *reset {
                handle_config_reset()?;
            } else {
                println!("Usage: colorwatch config [--show|--path|--reset]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --path    Show config file path");
                println!("  --reset   Reset config file to defaults");
            }
            Ok(true)
        }
        Some(Commands::Toggle) => {
            let backend = HttpBackend::new(&config.backend_url, config.request_timeout)?;
            let response = backend
                .toggle_detection()
                .await
                .context("Failed to toggle detection")?;
            let state = if response.is_active() {
                "Detection Active"
            } else {
                "Detection Paused"
            };
            println!("{} (status: {})", state, response.status);
            Ok(true)
        }
        Some(Commands::Stats) => {
            let backend = HttpBackend::new(&config.backend_url, config.request_timeout)?;
            let stats = backend.stats().await.context("Failed to fetch statistics")?;
            for field in StatField::ALL {
                println!("{:<15} {}", field.label(), stats.get(field));
            }
            Ok(true)
        }
        None => Ok(false),
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show(config: &Config) {
    println!("# Effective configuration (flags > env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating directory {}", parent.display()))?;
    }

    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Error writing config {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}
