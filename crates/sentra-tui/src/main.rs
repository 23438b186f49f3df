//! `sentra` — Terminal console for Modbus gateway configuration.
//!
//! Built on [ratatui](https://ratatui.rs) over the REST surface exposed
//! by a sentra gateway. Screens are navigable via number keys (1-3):
//! Devices, Points, and Monitor.
//!
//! Logs are written to a file to avoid corrupting the terminal UI.
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and
//! app launch.

mod action;
mod app;
mod component;
mod event;
mod modal;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sentra_config::Config;
use sentra_core::Console;

use crate::app::App;

/// Terminal console for configuring and monitoring a sentra gateway.
#[derive(Parser, Debug)]
#[command(name = "sentra", version, about)]
struct Cli {
    /// Gateway URL (e.g., http://192.168.1.50:8080)
    #[arg(short = 'u', long, env = "SENTRA_URL")]
    url: Option<String>,

    /// Path to a config file (defaults to the platform config dir)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log file path (defaults to sentra.log in the platform data dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli, config: &Config) -> Result<WorkerGuard> {
    let log_level = match cli.verbose {
        0 => config.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sentra={log_level}")));

    let log_path = match &cli.log_file {
        Some(path) => path.clone(),
        None => config
            .log_dir
            .clone()
            .unwrap_or_else(sentra_config::log_dir)
            .join("sentra.log"),
    };
    let log_dir = log_path
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."));
    std::fs::create_dir_all(log_dir).wrap_err("creating log directory")?;
    let log_filename = log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("sentra.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Priority: CLI flag > SENTRA_* env > config file > defaults.
    let mut config = match &cli.config {
        Some(path) => sentra_config::load_config_from(path)?,
        None => sentra_config::load_config()?,
    };
    if let Some(url) = &cli.url {
        config.gateway = url.clone();
    }

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli, &config)?;

    let gateway_url = config.gateway_url()?;
    info!(gateway = %gateway_url, "starting sentra console");

    let console = Console::new(gateway_url.clone(), &config.transport())?;
    let mut app = App::new(console, gateway_url.to_string(), config.page_size);
    app.run().await?;

    Ok(())
}
