//! Detail panel for the selected suggestion: level, status, reason and the
//! original → replacement diff.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use redpen_core::filter::{word_diff, DiffKind};
use redpen_core::{Status, Suggestion};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Lines describing `suggestion`.
pub fn detail_lines(suggestion: &Suggestion, theme: &Theme) -> Vec<Line<'static>> {
    let level_style = Style::default().fg(theme.level(suggestion.level)).add_modifier(Modifier::BOLD);
    let status_style = match suggestion.status {
        Status::Pending => Style::default().fg(theme.text),
        Status::Accepted => Style::default().fg(theme.accepted),
        Status::Rejected => Style::default().fg(theme.muted),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(suggestion.level.label().to_owned(), level_style),
            Span::raw("  "),
            Span::styled(suggestion.status.label().to_owned(), status_style),
        ]),
        Line::default(),
    ];

    if !suggestion.reason.is_empty() {
        lines.push(Line::styled(suggestion.reason.clone(), Style::default().fg(theme.text)));
        lines.push(Line::default());
    }

    match &suggestion.replacement {
        Some(replacement) if replacement.is_empty() => {
            lines.push(Line::styled("Remove:", Style::default().fg(theme.muted)));
            lines.push(Line::styled(
                suggestion.original.clone(),
                Style::default().fg(theme.diff_removed).add_modifier(Modifier::CROSSED_OUT),
            ));
        }
        Some(replacement) => {
            lines.push(Line::styled("Change:", Style::default().fg(theme.muted)));
            let parts = word_diff(&suggestion.original, replacement);
            lines.push(Line::from(
                parts
                    .into_iter()
                    .map(|part| {
                        let style = match part.kind {
                            DiffKind::Equal => Style::default().fg(theme.text),
                            DiffKind::Removed => Style::default()
                                .fg(theme.diff_removed)
                                .add_modifier(Modifier::CROSSED_OUT),
                            DiffKind::Added => Style::default().fg(theme.diff_added),
                        };
                        Span::styled(part.value, style)
                    })
                    .collect::<Vec<_>>(),
            ));
        }
        None => {
            lines.push(Line::styled("Flagged:", Style::default().fg(theme.muted)));
            lines.push(Line::styled(
                suggestion.original.clone(),
                Style::default().add_modifier(Modifier::UNDERLINED),
            ));
        }
    }

    if suggestion.status == Status::Pending {
        lines.push(Line::default());
        lines.push(Line::styled("a accept · r reject", Style::default().fg(theme.muted)));
    }
    lines
}

/// Renders the detail panel; skipped when collapsed to zero width.
pub fn render_detail(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    if area.width == 0 {
        return;
    }
    frame.render_widget(panel_block(" Suggestion ", false, theme), area);

    let lines = match state.selected_suggestion() {
        Some(suggestion) => detail_lines(suggestion, theme),
        None => vec![Line::styled(
            "No visible suggestions at this focus level.",
            Style::default().fg(theme.muted),
        )],
    };
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner_rect(area));
}
