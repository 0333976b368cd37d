mod app;
mod cli;
mod core;
mod event;
mod surface;
mod widgets;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::mpsc;
use std::sync::Mutex;

use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use tracing_subscriber::EnvFilter;

use app::App;
use cli::parse_args;
use crate::core::enumerator::NetstatEnumerator;
use crate::core::process::SysinfoResolver;
use crate::core::snapshot::SnapshotSource;
use event::{spawn_listener, ShutdownSignal, COMMAND_CAPACITY};

/// The dashboard owns the terminal, so diagnostics go to a file or nowhere.
fn setup_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let options = parse_args();
    setup_tracing(options.log_file.as_deref())?;

    let mut terminal = ratatui::try_init().context("Failed to initialize terminal")?;
    let mouse_enabled = execute!(std::io::stdout(), EnableMouseCapture).is_ok();

    let shutdown = ShutdownSignal::new();
    let (tx, rx) = mpsc::sync_channel(COMMAND_CAPACITY);
    let listener = match spawn_listener(tx, shutdown.clone()) {
        Ok(listener) => listener,
        Err(e) => {
            ratatui::restore();
            return Err(e).context("Failed to start terminal event listener");
        }
    };

    tracing::info!("connwatch started");
    let source = SnapshotSource::new(NetstatEnumerator::new(), SysinfoResolver::new());
    App::new(source).run(&mut terminal, &rx, &shutdown);

    shutdown.trigger();
    drop(rx);
    if listener.join().is_err() {
        tracing::warn!("terminal event listener panicked");
    }

    if mouse_enabled {
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
    }
    ratatui::restore();

    println!("Exiting...");
    Ok(())
}
