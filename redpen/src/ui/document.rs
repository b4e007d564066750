//! Document panel: the source text in the editor view, the styled span
//! overlay in the review view.
//!
//! Span text may contain newlines, so every styled run is split into
//! terminal lines as it is appended. The paragraph is drawn with wrapping,
//! so scroll offsets count wrapped rows rather than source lines.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use redpen_core::filter::{presentation, DiffKind, Presentation};
use redpen_core::model::Span as DocSpan;
use redpen_core::Level;

use crate::app::{AppState, Mode, View};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Styled document lines plus the wrapped row on which the selected span starts.
pub struct DocumentLines {
    pub lines: Vec<Line<'static>>,
    pub selected_row: Option<u16>,
}

/// Appends `text` in `style`, opening a new line at every `'\n'`.
fn push_run(lines: &mut Vec<Line<'static>>, text: &str, style: Style) {
    for (i, piece) in text.split('\n').enumerate() {
        if i > 0 || lines.is_empty() {
            lines.push(Line::default());
        }
        if !piece.is_empty() {
            if let Some(line) = lines.last_mut() {
                line.push_span(Span::styled(piece.to_owned(), style));
            }
        }
    }
}

/// Row at which the next appended character lands once `lines` are wrapped
/// to `width` columns.
///
/// Counts by display width, so a word pushed to the next row by the word
/// wrapper can put the real row slightly below this estimate.
fn wrapped_row(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let Some((current, earlier)) = lines.split_last() else {
        return 0;
    };
    let rows: usize = earlier.iter().map(|line| line.width().div_ceil(width).max(1)).sum();
    u16::try_from(rows + current.width() / width).unwrap_or(u16::MAX)
}

/// Styles every span according to its presentation under `focus`.
///
/// # Arguments
///
/// * `spans`: the session's span sequence
/// * `focus`: current focus ceiling
/// * `selected`: index of the span under the cursor
/// * `width`: columns available to the wrapped paragraph
/// * `theme`: active color theme
pub fn build_review_lines(
    spans: &[DocSpan],
    focus: Level,
    selected: Option<usize>,
    width: u16,
    theme: &Theme,
) -> DocumentLines {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut selected_row = None;
    let base = Style::default().fg(theme.text);

    for (index, span) in spans.iter().enumerate() {
        let is_selected = selected == Some(index);
        if is_selected {
            selected_row = Some(wrapped_row(&lines, width));
        }
        let mark = |style: Style| {
            if is_selected { style.add_modifier(Modifier::REVERSED) } else { style }
        };

        match presentation(span, focus) {
            Presentation::Plain => push_run(&mut lines, &span.text, base),
            Presentation::Accepted => {
                push_run(&mut lines, &span.text, mark(Style::default().fg(theme.accepted)))
            }
            Presentation::Flag { level } => push_run(
                &mut lines,
                &span.text,
                mark(Style::default().fg(theme.level(level)).add_modifier(Modifier::UNDERLINED)),
            ),
            Presentation::Diff { level, parts } => {
                for part in parts {
                    let style = match part.kind {
                        DiffKind::Equal => Style::default().fg(theme.level(level)),
                        DiffKind::Removed => Style::default()
                            .fg(theme.diff_removed)
                            .add_modifier(Modifier::CROSSED_OUT),
                        DiffKind::Added => {
                            Style::default().fg(theme.diff_added).add_modifier(Modifier::BOLD)
                        }
                    };
                    push_run(&mut lines, &part.value, mark(style));
                }
            }
        }
    }

    DocumentLines { lines, selected_row }
}

/// Lines for the editor view, with a cursor block at the end in insert mode.
pub fn build_editor_lines(text: &str, insert: bool, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if text.is_empty() && !insert {
        lines.push(Line::styled(
            "Press i to type, s for a sample text, or pipe a file in.",
            Style::default().fg(theme.muted),
        ));
        return lines;
    }
    push_run(&mut lines, text, Style::default().fg(theme.text));
    if insert {
        if lines.is_empty() {
            lines.push(Line::default());
        }
        if let Some(line) = lines.last_mut() {
            line.push_span(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
        }
    }
    lines
}

/// Renders the document panel into `area`.
///
/// Brings the selected highlight into view when the selection has moved
/// since the last frame. Manual scrolling is left alone otherwise.
pub fn render_document(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let title = match state.view {
        View::Editor => " Text ".to_owned(),
        View::Review => format!(
            " Review · {} highlighted ",
            state.session.visible_highlights().len()
        ),
    };
    let block = panel_block(title, true, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let lines = match state.view {
        View::Editor => build_editor_lines(state.session.text(), state.mode == Mode::Insert, theme),
        View::Review => {
            let doc = build_review_lines(
                state.session.spans(),
                state.session.focus_level(),
                state.selected_span(),
                inner.width,
                theme,
            );
            state.follow_selected_row(doc.selected_row);
            doc.lines
        }
    };

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((state.document_scroll, 0)),
        inner,
    );
}
