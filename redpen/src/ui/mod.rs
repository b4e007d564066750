//! UI rendering module for redpen.
//!
//! `render()` is the single entry point called from the event loop's
//! `terminal.draw()` closure. Layout arithmetic and the two bars live in
//! `layout.rs`; the document and detail panels have their own modules.

mod layout;
pub mod detail;
pub mod document;
pub mod help;
pub mod keybindings;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_focus_bar, render_status_bar};

/// Renders one complete frame.
///
/// The document viewport height is cached into `state` before drawing so the
/// next keypress can compute half-page scrolls.
///
/// # Arguments
///
/// * `frame`: current render frame provided by `terminal.draw()`
/// * `state`: mutable app state (viewport height and scroll are updated here)
/// * `theme`: active color theme
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [focus_bar, document, detail, status_bar] = compute_layout(frame, state);

    state.document_viewport_height = inner_rect(document).height;

    render_focus_bar(frame, focus_bar, state, theme);
    document::render_document(frame, document, state, theme);
    detail::render_detail(frame, detail, state, theme);
    render_status_bar(frame, status_bar, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}
