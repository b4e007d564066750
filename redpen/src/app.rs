//! Central application state for redpen.
//!
//! Owns the review [`Session`] together with everything that only matters to
//! the terminal: mode, view, selection cursor, scroll offsets and the status
//! message. No ratatui rendering logic lives here; `app.rs` is read by the
//! render module and mutated by the keybinding dispatcher.

use redpen_core::{
    AnalysisOutcome, AnalysisTicket, Level, Session, SessionError, Suggestion,
};

use crate::analysis::AnalysisPayload;

/// Text offered by `s` when the editor is empty.
pub const SAMPLE_TEXT: &str = "This are a sample text with several issue's. The sentences is short. \
They dont flow well together. The argument lack supporting evidence and could be more persuasive \
with example's.";

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Editor mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigation and review commands (default).
    #[default]
    Normal,
    /// Appending text to the source document.
    Insert,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
}

/// Which rendering of the document is shown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The raw source text.
    #[default]
    Editor,
    /// The span overlay produced by the last analysis.
    Review,
}

/// One line of feedback for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    /// Current editor mode governing which keybindings are active.
    pub mode: Mode,
    pub view: View,
    /// Review state: text, spans, history and focus level.
    pub session: Session,
    /// Position of the cursor within the visible highlights.
    pub selected: usize,

    /// Vertical scroll offset for the document panel, in wrapped rows.
    pub document_scroll: u16,
    /// Set when the cursor moves; the next render scrolls the highlight into view.
    follow_selection: bool,
    /// Inner height of the document panel, cached after each render.
    pub document_viewport_height: u16,
    /// Vertical scroll offset for the help overlay.
    pub help_scroll: u16,

    pub status: Option<StatusMessage>,
    /// Credential forwarded to the provider; never displayed.
    pub api_key: Option<String>,
    spinner_frame: usize,
}

impl AppState {
    /// Builds state around `text` with the configured focus ceiling.
    pub fn new(text: impl Into<String>, focus: Level, api_key: Option<String>) -> Self {
        let mut session = Session::new(text);
        session.set_focus_level(focus);
        Self {
            mode: Mode::default(),
            view: View::default(),
            session,
            selected: 0,
            document_scroll: 0,
            follow_selection: false,
            document_viewport_height: 0,
            help_scroll: 0,
            status: None,
            api_key,
            spinner_frame: 0,
        }
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage { text: text.into(), is_error: false });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage { text: text.into(), is_error: true });
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Span index under the cursor, if any highlight is visible.
    pub fn selected_span(&self) -> Option<usize> {
        if self.view != View::Review {
            return None;
        }
        let visible = self.session.visible_highlights();
        let last = visible.len().checked_sub(1)?;
        visible.get(self.selected.min(last)).copied()
    }

    /// The suggestion bound to the selected span.
    pub fn selected_suggestion(&self) -> Option<&Suggestion> {
        let index = self.selected_span()?;
        self.session.spans().get(index)?.suggestion.as_ref()
    }

    pub fn select_next(&mut self) {
        let count = self.session.visible_highlights().len();
        if count > 0 {
            self.selected = (self.selected + 1).min(count - 1);
        }
        self.follow_selection = true;
    }

    pub fn select_prev(&mut self) {
        let count = self.session.visible_highlights().len();
        self.selected = self.selected.min(count.saturating_sub(1)).saturating_sub(1);
        self.follow_selection = true;
    }

    fn clamp_selection(&mut self) {
        let count = self.session.visible_highlights().len();
        self.selected = self.selected.min(count.saturating_sub(1));
        self.follow_selection = true;
    }

    // -----------------------------------------------------------------------
    // Review actions
    // -----------------------------------------------------------------------

    pub fn accept_selected(&mut self) {
        let Some(id) = self.selected_suggestion().map(|s| s.id.clone()) else {
            return;
        };
        if self.session.accept(&id) {
            self.set_info(format!("accepted {id}"));
        } else {
            self.set_info("suggestion already decided");
        }
    }

    pub fn reject_selected(&mut self) {
        let Some(id) = self.selected_suggestion().map(|s| s.id.clone()) else {
            return;
        };
        if self.session.reject(&id) {
            self.clamp_selection();
            self.set_info(format!("rejected {id}"));
        } else {
            self.set_info("suggestion already decided");
        }
    }

    pub fn undo(&mut self) {
        if self.session.undo() {
            self.clamp_selection();
            self.set_info("undone");
        } else {
            self.set_info("nothing to undo");
        }
    }

    pub fn set_focus_level(&mut self, level: Level) {
        self.session.set_focus_level(level);
        self.clamp_selection();
    }

    pub fn raise_focus(&mut self) {
        self.set_focus_level(self.session.focus_level().next());
    }

    pub fn lower_focus(&mut self) {
        self.set_focus_level(self.session.focus_level().prev());
    }

    /// Switches between editor and review once an analysis exists.
    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Editor if self.session.has_analysis() => View::Review,
            _ => View::Editor,
        };
        self.document_scroll = 0;
        self.follow_selection = true;
    }

    // -----------------------------------------------------------------------
    // Analysis lifecycle
    // -----------------------------------------------------------------------

    /// Starts an analysis of the current text.
    ///
    /// Refusals (blank text, no credential, request already running) are
    /// reported in the status bar and return `None`.
    pub fn begin_analysis(&mut self) -> Option<AnalysisTicket> {
        match self.session.begin_analysis(self.api_key.as_deref()) {
            Ok(ticket) => {
                self.set_info("analyzing…");
                Some(ticket)
            }
            Err(err) => {
                self.set_error(err.to_string());
                None
            }
        }
    }

    /// Feeds a finished provider call back into the session.
    pub fn apply_analysis(&mut self, payload: AnalysisPayload) {
        match self.session.finish_analysis(payload.ticket, payload.result) {
            Ok(AnalysisOutcome::Applied { suggestions, highlighted, misses }) => {
                self.view = View::Review;
                self.selected = 0;
                self.document_scroll = 0;
                self.follow_selection = true;
                let mut message = format!("{highlighted} of {suggestions} suggestions placed");
                if !misses.is_empty() {
                    message.push_str(&format!(", {} not found in text", misses.len()));
                }
                self.set_info(message);
            }
            Ok(AnalysisOutcome::Stale) => {
                self.set_info("text changed during analysis; result discarded");
            }
            Err(SessionError::Provider(err)) => self.set_error(format!("analysis failed: {err}")),
            Err(err) => self.set_error(err.to_string()),
        }
    }

    /// Advances the spinner while a request is running.
    pub fn tick(&mut self) {
        if self.session.is_analyzing() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
        }
    }

    /// Spinner glyph, or `None` when idle.
    pub fn spinner(&self) -> Option<&'static str> {
        self.session.is_analyzing().then(|| SPINNER[self.spinner_frame])
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Appends `s` to the source text, discarding any analysis.
    pub fn insert_str(&mut self, s: &str) {
        let had_analysis = self.session.has_analysis();
        self.session.push_str(s);
        self.after_edit(had_analysis);
    }

    pub fn backspace(&mut self) {
        let had_analysis = self.session.has_analysis();
        self.session.pop_char();
        self.after_edit(had_analysis);
    }

    /// Loads [`SAMPLE_TEXT`]; only allowed while the text is empty.
    pub fn load_sample(&mut self) -> bool {
        if !self.session.text().is_empty() {
            return false;
        }
        self.session.set_text(SAMPLE_TEXT);
        self.view = View::Editor;
        self.set_info("sample text loaded; press Enter to analyze");
        true
    }

    fn after_edit(&mut self, had_analysis: bool) {
        self.view = View::Editor;
        self.selected = 0;
        if had_analysis {
            self.set_info("text edited; analysis cleared");
        }
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    pub fn scroll_down(&mut self, lines: u16) {
        self.document_scroll = self.document_scroll.saturating_add(lines);
        self.follow_selection = false;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.document_scroll = self.document_scroll.saturating_sub(lines);
        self.follow_selection = false;
    }

    /// Scrolls by half the viewport cached from the previous render.
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.document_viewport_height / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.document_viewport_height / 2).max(1));
    }

    /// Scrolls to `row` if the cursor moved since the last call.
    ///
    /// Called on every render with the wrapped row of the selected highlight.
    /// Scrolling by hand clears the pending move, so redraws keep the
    /// user's position until the cursor moves again.
    pub fn follow_selected_row(&mut self, row: Option<u16>) {
        if std::mem::take(&mut self.follow_selection) {
            if let Some(row) = row {
                self.ensure_line_visible(row);
            }
        }
    }

    /// Adjusts the scroll offset so `line` is inside the viewport.
    pub fn ensure_line_visible(&mut self, line: u16) {
        let height = self.document_viewport_height.max(1);
        if line < self.document_scroll {
            self.document_scroll = line;
        } else if line >= self.document_scroll.saturating_add(height) {
            self.document_scroll = line.saturating_sub(height - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redpen_core::{ProviderError, SuggestionDraft};

    fn draft(level: u8, original: &str, replacement: Option<&str>) -> SuggestionDraft {
        SuggestionDraft {
            level: Level::try_from(level).unwrap(),
            original: original.to_owned(),
            replacement: replacement.map(str::to_owned),
            reason: "r".to_owned(),
        }
    }

    fn analysed(text: &str, drafts: Vec<SuggestionDraft>) -> AppState {
        let mut state = AppState::new(text, Level::Content, Some("sk-test".to_owned()));
        let ticket = state.begin_analysis().unwrap();
        state.apply_analysis(AnalysisPayload { ticket, result: Ok(drafts) });
        state
    }

    #[test]
    fn analysis_switches_to_review_and_selects_first() {
        let state = analysed(
            "This are a test.",
            vec![draft(1, "This are", Some("This is")), draft(3, "test", None)],
        );
        assert_eq!(state.view, View::Review);
        assert_eq!(state.selected_span(), Some(0));
        assert_eq!(state.status.as_ref().unwrap().text, "2 of 2 suggestions placed");
    }

    #[test]
    fn missing_key_is_reported_not_started() {
        let mut state = AppState::new("text", Level::Grammar, None);
        assert!(state.begin_analysis().is_none());
        assert!(state.status.as_ref().unwrap().is_error);
        assert!(!state.session.is_analyzing());
    }

    #[test]
    fn provider_failure_keeps_editor_view() {
        let mut state = AppState::new("text", Level::Grammar, Some("k".to_owned()));
        let ticket = state.begin_analysis().unwrap();
        state.apply_analysis(AnalysisPayload { ticket, result: Err(ProviderError::Truncated) });
        assert_eq!(state.view, View::Editor);
        let status = state.status.unwrap();
        assert!(status.is_error);
        assert!(status.text.starts_with("analysis failed"));
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut state = analysed(
            "one two three",
            vec![draft(1, "one", Some("1")), draft(1, "three", Some("3"))],
        );
        state.select_prev();
        assert_eq!(state.selected, 0);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected_suggestion().unwrap().original, "three");
    }

    #[test]
    fn reject_moves_cursor_to_remaining_highlight() {
        let mut state = analysed(
            "one two three",
            vec![draft(1, "one", Some("1")), draft(1, "three", Some("3"))],
        );
        state.select_next();
        state.reject_selected();
        assert_eq!(state.selected_suggestion().unwrap().original, "one");
        state.undo();
        assert_eq!(state.session.visible_highlights().len(), 2);
    }

    #[test]
    fn accept_then_undo_restores_document() {
        let mut state = analysed("This are a test.", vec![draft(1, "This are", Some("This is"))]);
        state.accept_selected();
        assert_eq!(state.session.document(), "This is a test.");
        state.accept_selected();
        assert_eq!(state.status.as_ref().unwrap().text, "suggestion already decided");
        state.undo();
        assert_eq!(state.session.document(), "This are a test.");
    }

    #[test]
    fn lowering_focus_hides_higher_levels() {
        let mut state = analysed(
            "one two",
            vec![draft(1, "one", Some("1")), draft(3, "two", None)],
        );
        state.select_next();
        state.set_focus_level(Level::Grammar);
        assert_eq!(state.session.visible_highlights(), vec![0]);
        assert_eq!(state.selected_suggestion().unwrap().original, "one");
        state.raise_focus();
        assert_eq!(state.session.focus_level(), Level::Structure);
    }

    #[test]
    fn editing_clears_analysis_and_returns_to_editor() {
        let mut state = analysed("typo", vec![draft(1, "typo", Some("type"))]);
        state.insert_str("s");
        assert_eq!(state.view, View::Editor);
        assert!(!state.session.has_analysis());
        assert_eq!(state.session.text(), "typos");
        state.toggle_view();
        assert_eq!(state.view, View::Editor, "no analysis to review");
    }

    #[test]
    fn sample_only_loads_into_empty_text() {
        let mut state = AppState::new("", Level::Grammar, None);
        assert!(state.load_sample());
        assert_eq!(state.session.text(), SAMPLE_TEXT);
        assert!(!state.load_sample());
    }

    #[test]
    fn ensure_line_visible_scrolls_both_ways() {
        let mut state = AppState::new("", Level::Grammar, None);
        state.document_viewport_height = 5;
        state.ensure_line_visible(12);
        assert_eq!(state.document_scroll, 8);
        state.ensure_line_visible(3);
        assert_eq!(state.document_scroll, 3);
    }

    #[test]
    fn manual_scroll_survives_until_cursor_moves() {
        let mut state = analysed(
            "one two three",
            vec![draft(1, "one", Some("1")), draft(1, "three", Some("3"))],
        );
        state.document_viewport_height = 5;

        state.follow_selected_row(Some(30));
        assert_eq!(state.document_scroll, 26);

        state.scroll_down(20);
        state.follow_selected_row(Some(30));
        assert_eq!(state.document_scroll, 46, "repeat renders do not snap back");

        state.half_page_up();
        assert_eq!(state.document_scroll, 44);

        state.select_next();
        state.follow_selected_row(Some(12));
        assert_eq!(state.document_scroll, 12);
    }
}
