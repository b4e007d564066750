//! Screen layout for redpen.
//!
//! Pure layout arithmetic plus the two one-row bars. Called inside
//! `terminal.draw()` on every render so each frame reflects the current
//! terminal size.
//!
//! # Geometry
//!
//! ```text
//! ┌ focus bar (1 row) ─────────────────────────┐
//! │ document                 │ detail          │
//! │                          │ (review, ≥ 100) │
//! └ status bar (1 row) ────────────────────────┘
//! ```
//!
//! The detail panel collapses below 100 columns and in the editor view.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};
use redpen_core::{Level, Status};

use crate::app::{AppState, Mode, View};
use crate::theme::Theme;

const DETAIL_MIN_TERM_WIDTH: u16 = 100;
const DETAIL_WIDTH: u16 = 42;

/// Returns `[focus_bar, document, detail, status_bar]` for the current frame.
///
/// `detail` has zero width when it is collapsed.
pub fn compute_layout(frame: &Frame, state: &AppState) -> [Rect; 4] {
    let area = frame.area();
    let [focus_bar, main_area, status_bar] = area.layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]));

    let show_detail = state.view == View::Review && area.width >= DETAIL_MIN_TERM_WIDTH;
    let detail_width = if show_detail { DETAIL_WIDTH } else { 0 };
    let [document, detail] = main_area.layout(
        &Layout::horizontal([Constraint::Fill(1), Constraint::Length(detail_width)])
            .spacing(Spacing::Overlap(1)),
    );

    [focus_bar, document, detail, status_bar]
}

/// Strips the 1-cell border from a panel `Rect`.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// Active panels get a thick border. `MergeStrategy::Fuzzy` keeps junctions
/// correct where thick and plain borders meet.
///
/// # Arguments
///
/// * `title`: panel title shown in the top border
/// * `is_active`: `true` when this panel is the one being worked in
/// * `theme`: active color theme
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_active: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_active {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_active { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the level selector: each level with its pending count, levels
/// above the focus ceiling dimmed.
pub fn render_focus_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let focus = state.session.focus_level();
    let mut spans = vec![Span::styled(" Focus ", Style::default().fg(theme.muted))];

    for level in Level::ALL {
        let pending = state
            .session
            .suggestions()
            .iter()
            .filter(|s| s.level == level && s.status == Status::Pending)
            .count();
        let label = format!(" {} {} ({pending}) ", level.as_u8(), level.label());
        let mut style = Style::default().fg(theme.level(level));
        if level > focus {
            style = Style::default().fg(theme.muted);
        } else if level == focus {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        spans.push(Span::styled(label, style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders the 1-row status bar.
///
/// Left to right: mode, view, spinner while analyzing, undo depth, then the
/// last status message. Never renders blank.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::Normal | Mode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
    };
    let view_text = match state.view {
        View::Editor => " editor ",
        View::Review => " review ",
    };

    let mut spans = vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::raw(view_text),
    ];
    if let Some(spinner) = state.spinner() {
        spans.push(Span::raw(format!(" {spinner} analyzing ")));
    }
    if state.session.can_undo() {
        spans.push(Span::raw(format!(" undo:{} ", state.session.undo_depth())));
    }
    if let Some(status) = &state.status {
        let fg = if status.is_error { theme.error } else { theme.status_bar_fg };
        spans.push(Span::styled(format!(" {}", status.text), Style::default().fg(fg)));
    } else {
        spans.push(Span::styled(" ? for help", Style::default().fg(theme.muted)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
