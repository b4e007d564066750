//! Terminal lifecycle management for redpen.
//!
//! The TUI draws on stderr. Stdout carries the reviewed document when the
//! session ends, so `redpen draft.md > final.md` leaves a clean file behind
//! and the interface still appears on the terminal.

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use signal_hook::consts::SIGTERM;
use signal_hook::flag::register;
use std::io::{stderr, BufWriter, Stderr};
use std::panic;
use std::sync::{atomic::AtomicBool, Arc};

/// CrosstermBackend over a buffered stderr writer.
///
/// `BufWriter` batches escape sequences into fewer write(2) calls per frame.
pub type Tui = Terminal<CrosstermBackend<BufWriter<Stderr>>>;

/// Enables raw mode and enters the alternate screen on stderr.
///
/// Call [`restore_tui`] on every exit path.
///
/// # Errors
///
/// Returns `Err` if raw mode, the screen switch, or `Terminal::new` fails.
pub fn init_tui() -> std::io::Result<Tui> {
    let mut out = BufWriter::new(stderr());
    enable_raw_mode()?;
    execute!(out, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(out))
}

/// Leaves the alternate screen and disables raw mode.
///
/// Idempotent. ratatui 0.30 does not restore the terminal on `Drop`, so this
/// runs after the event loop and from the panic hook.
///
/// # Errors
///
/// Returns `Err` if `disable_raw_mode` or `execute!` fails.
pub fn restore_tui() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(stderr(), LeaveAlternateScreen)?;
    Ok(())
}

/// Installs a panic hook that restores the terminal, then chains to the
/// previous hook so the panic message is printed on a usable screen.
///
/// Must be called before [`init_tui`].
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_tui();
        tracing::error!(panic = %panic_info, "redpen panicked");
        original_hook(panic_info);
    }));
}

/// Registers a SIGTERM handler and returns the flag it sets.
///
/// The main loop polls the flag on a short heartbeat.
///
/// # Errors
///
/// Returns `Err` if the OS refuses the registration.
pub fn register_sigterm() -> std::io::Result<Arc<AtomicBool>> {
    let term = Arc::new(AtomicBool::new(false));
    // The handler only performs an atomic store, which is async-signal-safe.
    register(SIGTERM, Arc::clone(&term))?;
    Ok(term)
}
