//! Keybinding dispatcher for redpen.
//!
//! Translates crossterm `KeyEvent`s into `AppState` mutations and returns a
//! `KeyAction` for the event loop. Dispatch branches first on `state.mode`,
//! then on the view, so each context has an isolated handler.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use redpen_core::Level;

use crate::app::{AppState, Mode, View};

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Keep running; the next render picks up any state change.
    Continue,
    /// Leave the event loop and print the document.
    Quit,
    /// Start an analysis of the current text.
    Analyze,
}

/// Dispatches a key event to the handler matching the current mode.
///
/// `Ctrl-c` quits from every mode.
///
/// # Arguments
///
/// * `key`  : the raw crossterm key event (code + modifiers)
/// * `state`: mutable reference to all UI state
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Insert => handle_insert(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if state.view == View::Review {
        if let Some(action) = handle_review_key(key, state) {
            return action;
        }
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Enter if state.view == View::Editor => KeyAction::Analyze,
        KeyCode::Char('i') => {
            state.mode = Mode::Insert;
            state.view = View::Editor;
            KeyAction::Continue
        }
        KeyCode::Char('s') => {
            if !state.load_sample() {
                state.set_info("sample text is only offered for an empty editor");
            }
            KeyAction::Continue
        }
        KeyCode::Tab => {
            state.toggle_view();
            KeyAction::Continue
        }
        KeyCode::Char('d') if ctrl => {
            state.half_page_down();
            KeyAction::Continue
        }
        KeyCode::Char('u') if ctrl => {
            state.half_page_up();
            KeyAction::Continue
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.scroll_down(1);
            KeyAction::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.scroll_up(1);
            KeyAction::Continue
        }
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        KeyCode::Char('q') => KeyAction::Quit,
        _ => KeyAction::Continue,
    }
}

/// Review-only keys. Returns `None` when the key falls through to the
/// general Normal handler.
fn handle_review_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('n') | KeyCode::Char('j') | KeyCode::Down => state.select_next(),
        KeyCode::Char('p') | KeyCode::Char('k') | KeyCode::Up => state.select_prev(),
        KeyCode::Char('a') => state.accept_selected(),
        KeyCode::Char('r') => state.reject_selected(),
        KeyCode::Char('u') => state.undo(),
        KeyCode::Char('1') => state.set_focus_level(Level::Grammar),
        KeyCode::Char('2') => state.set_focus_level(Level::Structure),
        KeyCode::Char('3') => state.set_focus_level(Level::Content),
        KeyCode::Char('+') | KeyCode::Char('=') => state.raise_focus(),
        KeyCode::Char('-') => state.lower_focus(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            state.mode = Mode::Normal;
        }
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Appends typed characters to the source text. `Esc` returns to Normal.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Enter => state.insert_str("\n"),
        KeyCode::Tab => state.insert_str("\t"),
        KeyCode::Backspace => state.backspace(),
        KeyCode::Char(c)
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            let mut buf = [0u8; 4];
            state.insert_str(c.encode_utf8(&mut buf));
        }
        _ => {}
    }
    KeyAction::Continue
}
