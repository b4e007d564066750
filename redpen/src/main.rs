//! redpen: review writing suggestions in the terminal.
//!
//! Wires together the terminal lifecycle (`tui`), the unified event bus
//! (`event`), background analysis (`analysis`), rendering (`ui`), the theme
//! system (`theme`) and configuration (`config`).
//!
//! # Startup sequence
//!
//! 1. Parse flags, install the file logger, load config, read the input text.
//!    None of these touch the terminal.
//! 2. `install_panic_hook()` so a panic restores the terminal first.
//! 3. `register_sigterm()`, polled in the event loop.
//! 4. `init_tui()` enters the alternate screen on stderr.
//! 5. Spawn the event task and run the loop.
//! 6. `restore_tui()`, then write the document to stdout or `--output`.
//!
//! The event loop exits only via `break`, so `restore_tui()` is always
//! reached; the panic hook covers the rest.

mod analysis;
mod app;
mod config;
mod event;
mod logging;
mod theme;
mod tui;
mod ui;

use std::io::{IsTerminal, Read, Write};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use clap::Parser;
use redpen_core::provider::OpenAiClient;
use redpen_core::Level;

use crate::event::AppEvent;
use crate::ui::keybindings::{handle_key, KeyAction};

#[derive(Debug, Parser)]
#[command(name = "redpen", version, about = "Review AI writing suggestions in the terminal")]
struct Cli {
    /// Text file to review. Reads piped stdin when omitted.
    file: Option<PathBuf>,

    /// Write the final document here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Initial focus level (1 grammar, 2 structure, 3 content).
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=3))]
    level: Option<u8>,

    /// Color theme: catppuccin-mocha or dark.
    #[arg(long)]
    theme: Option<String>,

    /// Log file path. Defaults to $XDG_STATE_HOME/redpen/redpen.log.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Reads the document from `file`, or from stdin when it is not a terminal.
fn read_input(file: Option<&PathBuf>) -> std::io::Result<String> {
    if let Some(path) = file {
        return std::fs::read_to_string(path);
    }
    let mut text = String::new();
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        stdin.lock().read_to_string(&mut text)?;
    }
    Ok(text)
}

/// Writes the document to `output`, or to stdout.
fn write_output(document: &str, output: Option<&PathBuf>) -> std::io::Result<()> {
    match output {
        Some(path) => std::fs::write(path, document),
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(document.as_bytes())?;
            out.flush()
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    let _log_guard = logging::init(&log_path)?;

    let settings = config::load();
    let theme = theme::Theme::from_name(cli.theme.as_deref().unwrap_or(&settings.theme));
    let focus = cli
        .level
        .and_then(|n| Level::try_from(n).ok())
        .unwrap_or(settings.focus_level);
    let text = read_input(cli.file.as_ref())?;
    tracing::info!(bytes = text.len(), ?focus, model = %settings.provider.model, "starting");

    let client = OpenAiClient::new(settings.provider).map_err(|e| {
        tracing::error!(error = %e, "cannot build HTTP client");
        std::io::Error::other(e.to_string())
    })?;
    let client = Arc::new(client);
    let mut state = app::AppState::new(text, focus, settings.api_key);

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let tx = handler.tx;
    let mut rx = handler.rx;

    let mut loop_result: std::io::Result<()> = Ok(());

    'event_loop: loop {
        tokio::select! {
            // Heartbeat so SIGTERM is noticed even when no events arrive.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        // The only draw() call in the program.
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            loop_result = Err(e);
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Key(key)) => match handle_key(key, &mut state) {
                        KeyAction::Quit => break 'event_loop,
                        KeyAction::Analyze => {
                            if let Some(ticket) = state.begin_analysis() {
                                if let Some(key) = state.api_key.clone() {
                                    analysis::spawn_analysis(Arc::clone(&client), ticket, key, tx.clone());
                                }
                            }
                        }
                        KeyAction::Continue => {}
                    },
                    Some(AppEvent::AnalysisResult(payload)) => state.apply_analysis(*payload),
                    Some(AppEvent::Tick) => state.tick(),
                    // ratatui picks up the new size from frame.area() on the next Render.
                    Some(AppEvent::Resize(_, _)) => {}
                    Some(AppEvent::Quit) | None => break 'event_loop,
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    tui::restore_tui()?;
    loop_result?;

    let document = state.session.document();
    write_output(&document, cli.output.as_ref())?;
    tracing::info!(bytes = document.len(), "document written");
    Ok(())
}
