//! Help overlay renderer for redpen.
//!
//! Draws a centred modal over the current layout. `Clear` erases the area
//! first so the overlay is drawn inside the same `terminal.draw()` call as
//! every other panel.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay, scrolled by `help_scroll` rows.
///
/// Skipped on terminals narrower than 50 columns.
///
/// # Arguments
///
/// * `frame`: current render frame provided by `terminal.draw()`
/// * `theme`: active color theme
/// * `help_scroll`: vertical scroll offset; j/k in HelpOverlay mode mutate this field
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 50 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(70), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help · j/k scroll, ? or Esc to close ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text(theme))
            .block(block)
            .style(Style::default().bg(theme.background))
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text(theme: &Theme) -> Text<'static> {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let level = |n: u8, name: &'static str, color: Color| {
        Line::styled(format!("  {n}  {name}"), Style::default().fg(color))
    };
    Text::from(vec![
        Line::styled("Editing", heading),
        Line::from("  i             Insert mode (type at the end of the text)"),
        Line::from("  Esc           Back to normal mode"),
        Line::from("  s             Load a sample text (empty editor only)"),
        Line::from("  Enter         Analyze the text"),
        Line::from("  Tab           Switch between text and review"),
        Line::from(""),
        Line::styled("Review", heading),
        Line::from("  n / j / ↓     Next suggestion"),
        Line::from("  p / k / ↑     Previous suggestion"),
        Line::from("  a             Accept the selected suggestion"),
        Line::from("  r             Reject the selected suggestion"),
        Line::from("  u             Undo the last accept or reject"),
        Line::from("  Ctrl-d / u    Scroll half page down / up"),
        Line::from(""),
        Line::styled("Focus level (show this level and below)", heading),
        level(1, "Grammar", theme.level_grammar),
        level(2, "Structure", theme.level_structure),
        level(3, "Content", theme.level_content),
        Line::from("  + / -         Raise / lower the focus level"),
        Line::from(""),
        Line::styled("General", heading),
        Line::from("  ?             Open / close this help"),
        Line::from("  q / Ctrl-c    Quit and print the document"),
    ])
}
