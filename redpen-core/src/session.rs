//! Session controller: the single owner of mutable review state.
//!
//! Holds the source text, the current suggestion batch, the span sequence, the
//! undo history and the focus level. The reconciler, mutator and filter stay
//! pure; this type sequences them and enforces the analysis lifecycle:
//!
//! - at most one analysis in flight,
//! - an analysis result applies only to the text it was requested for,
//! - applying a result replaces suggestions, spans and history wholesale,
//! - any edit to the source text discards all of them.

use tracing::{debug, info, warn};

use crate::error::{ProviderError, SessionError};
use crate::filter;
use crate::model::{ingest, Level, Span, Suggestion, SuggestionDraft, SuggestionId};
use crate::mutate::{self, Action, History};
use crate::reconcile::reconcile_with_report;

/// Proof that an analysis was started, tied to the text it was started for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisTicket {
    generation: u64,
    text: String,
}

impl AnalysisTicket {
    /// The text snapshot to send to the provider.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a finished analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// The result replaced the session's review state.
    Applied {
        /// Suggestions the provider returned.
        suggestions: usize,
        /// Suggestions that produced a highlight.
        highlighted: usize,
        /// Suggestions dropped because their text was not found.
        misses: Vec<SuggestionId>,
    },
    /// The text changed while the request was in flight; the result was dropped.
    Stale,
}

/// In-memory review session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    text: String,
    suggestions: Vec<Suggestion>,
    spans: Vec<Span>,
    history: History,
    focus: Level,
    generation: u64,
    in_flight: Option<u64>,
}

impl Session {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    /// The source text as last set by the user.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the source text.
    ///
    /// When the text actually changes, the current analysis and undo history
    /// are discarded and any in-flight result becomes stale.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.text {
            return;
        }
        self.text = text;
        self.generation += 1;
        if self.has_analysis() || !self.history.is_empty() {
            debug!(generation = self.generation, "source text edited, discarding analysis");
        }
        self.suggestions.clear();
        self.spans.clear();
        self.history.clear();
    }

    /// Appends to the source text. Same invalidation rules as [`Session::set_text`].
    pub fn push_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let mut text = self.text.clone();
        text.push_str(s);
        self.set_text(text);
    }

    /// Removes the last character of the source text, if any.
    pub fn pop_char(&mut self) {
        let mut text = self.text.clone();
        if text.pop().is_some() {
            self.set_text(text);
        }
    }

    /// Validates inputs and marks an analysis as in flight.
    ///
    /// # Errors
    ///
    /// `EmptyText` for blank text, `MissingApiKey` for a blank credential,
    /// `AnalysisInFlight` when a previous request has not finished. The session
    /// is left untouched on error.
    pub fn begin_analysis(&mut self, api_key: Option<&str>) -> Result<AnalysisTicket, SessionError> {
        if self.in_flight.is_some() {
            return Err(SessionError::AnalysisInFlight);
        }
        if self.text.trim().is_empty() {
            return Err(SessionError::EmptyText);
        }
        if api_key.map_or(true, |key| key.trim().is_empty()) {
            return Err(SessionError::MissingApiKey);
        }
        self.in_flight = Some(self.generation);
        info!(generation = self.generation, bytes = self.text.len(), "analysis started");
        Ok(AnalysisTicket { generation: self.generation, text: self.text.clone() })
    }

    /// Applies or discards the provider's answer for `ticket`.
    ///
    /// A result for an outdated text is dropped whether it succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Provider` when the provider call failed; prior
    /// review state is kept.
    pub fn finish_analysis(
        &mut self,
        ticket: AnalysisTicket,
        result: Result<Vec<SuggestionDraft>, ProviderError>,
    ) -> Result<AnalysisOutcome, SessionError> {
        if self.in_flight == Some(ticket.generation) {
            self.in_flight = None;
        }
        if ticket.generation != self.generation {
            info!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding analysis result for edited text"
            );
            return Ok(AnalysisOutcome::Stale);
        }

        let drafts = result.inspect_err(|err| warn!(error = %err, "analysis failed"))?;
        let suggestions = ingest(drafts);
        let reconciliation = reconcile_with_report(&self.text, &suggestions);
        let highlighted = reconciliation.spans.iter().filter(|s| s.is_highlighted).count();

        info!(
            suggestions = suggestions.len(),
            highlighted,
            misses = reconciliation.misses.len(),
            "analysis applied"
        );

        let outcome = AnalysisOutcome::Applied {
            suggestions: suggestions.len(),
            highlighted,
            misses: reconciliation.misses,
        };
        self.suggestions = suggestions;
        self.spans = reconciliation.spans;
        self.history.clear();
        Ok(outcome)
    }

    pub fn is_analyzing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True once an analysis has been applied to the current text.
    pub fn has_analysis(&self) -> bool {
        !self.spans.is_empty()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Accepts the suggestion `id`. Returns `false` if nothing was pending under it.
    pub fn accept(&mut self, id: &SuggestionId) -> bool {
        self.act(id, Action::Accept)
    }

    /// Rejects the suggestion `id`. Returns `false` if nothing was pending under it.
    pub fn reject(&mut self, id: &SuggestionId) -> bool {
        self.act(id, Action::Reject)
    }

    fn act(&mut self, id: &SuggestionId, action: Action) -> bool {
        if !mutate::has_pending(&self.spans, id) {
            debug!(%id, ?action, "no pending span for suggestion");
            return false;
        }
        let next = mutate::apply_action(&self.spans, id, action);
        self.history.push(std::mem::replace(&mut self.spans, next));
        debug!(%id, ?action, depth = self.history.len(), "suggestion decided");
        true
    }

    /// Restores the span sequence from before the last decision.
    pub fn undo(&mut self) -> bool {
        let depth = self.history.len();
        let (spans, history) =
            mutate::undo(std::mem::take(&mut self.spans), std::mem::take(&mut self.history));
        self.spans = spans;
        self.history = history;
        self.history.len() < depth
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn focus_level(&self) -> Level {
        self.focus
    }

    pub fn set_focus_level(&mut self, level: Level) {
        self.focus = level;
    }

    /// Span indices currently shown as highlights under the focus level.
    pub fn visible_highlights(&self) -> Vec<usize> {
        filter::visible_highlights(&self.spans, self.focus)
    }

    /// The current document: edited spans when analysed, else the source text.
    pub fn document(&self) -> String {
        if self.has_analysis() {
            mutate::document_text(&self.spans)
        } else {
            self.text.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(level: Level, original: &str, replacement: Option<&str>) -> SuggestionDraft {
        SuggestionDraft {
            level,
            original: original.to_owned(),
            replacement: replacement.map(str::to_owned),
            reason: "reason".to_owned(),
        }
    }

    fn analysed(text: &str, drafts: Vec<SuggestionDraft>) -> Session {
        let mut session = Session::new(text);
        let ticket = session.begin_analysis(Some("sk-test")).unwrap();
        session.finish_analysis(ticket, Ok(drafts)).unwrap();
        session
    }

    #[test]
    fn validation_rejects_blank_inputs_without_mutation() {
        let mut session = Session::new("   ");
        assert!(matches!(session.begin_analysis(Some("k")), Err(SessionError::EmptyText)));
        assert!(!session.is_analyzing());

        session.set_text("text");
        assert!(matches!(session.begin_analysis(None), Err(SessionError::MissingApiKey)));
        assert!(matches!(session.begin_analysis(Some(" ")), Err(SessionError::MissingApiKey)));
        assert!(!session.is_analyzing());
    }

    #[test]
    fn second_analysis_is_refused_while_in_flight() {
        let mut session = Session::new("text");
        let ticket = session.begin_analysis(Some("k")).unwrap();
        assert!(matches!(session.begin_analysis(Some("k")), Err(SessionError::AnalysisInFlight)));
        session.finish_analysis(ticket, Ok(Vec::new())).unwrap();
        assert!(!session.is_analyzing());
        assert!(session.begin_analysis(Some("k")).is_ok());
    }

    #[test]
    fn empty_result_is_a_single_plain_span() {
        let session = analysed("All good.", Vec::new());
        assert!(session.has_analysis());
        assert_eq!(session.spans(), &[Span::plain("All good.")]);
    }

    #[test]
    fn stale_result_is_discarded() {
        let mut session = Session::new("This are fine");
        let ticket = session.begin_analysis(Some("k")).unwrap();
        session.push_str("!");
        let outcome = session
            .finish_analysis(ticket, Ok(vec![draft(Level::Grammar, "This are", Some("This is"))]))
            .unwrap();
        assert_eq!(outcome, AnalysisOutcome::Stale);
        assert!(!session.has_analysis());
        assert!(!session.is_analyzing());
    }

    #[test]
    fn provider_error_keeps_prior_state() {
        let mut session = analysed("teh end", vec![draft(Level::Grammar, "teh", Some("the"))]);
        let before = session.spans().to_vec();
        let ticket = session.begin_analysis(Some("k")).unwrap();
        let err = session.finish_analysis(ticket, Err(ProviderError::Truncated)).unwrap_err();
        assert!(matches!(err, SessionError::Provider(ProviderError::Truncated)));
        assert_eq!(session.spans(), before.as_slice());
        assert!(!session.is_analyzing());
    }

    #[test]
    fn accept_reject_undo_cycle() {
        let mut session = analysed(
            "This are a test.",
            vec![draft(Level::Grammar, "This are", Some("This is")), draft(Level::Content, "test", None)],
        );
        let ids: Vec<_> = session.suggestions().iter().map(|s| s.id.clone()).collect();
        let initial = session.spans().to_vec();

        assert!(session.accept(&ids[0]));
        assert_eq!(session.document(), "This is a test.");
        assert!(!session.accept(&ids[0]), "decided suggestion stays decided");
        assert_eq!(session.undo_depth(), 1);

        assert!(session.reject(&ids[1]));
        assert_eq!(session.undo_depth(), 2);

        assert!(session.undo());
        assert!(session.undo());
        assert!(!session.undo());
        assert_eq!(session.spans(), initial.as_slice());
    }

    #[test]
    fn editing_text_discards_analysis_and_history() {
        let mut session = analysed("teh end", vec![draft(Level::Grammar, "teh", Some("the"))]);
        let id = session.suggestions()[0].id.clone();
        session.accept(&id);
        assert!(session.can_undo());

        session.pop_char();
        assert_eq!(session.text(), "teh en");
        assert!(!session.has_analysis());
        assert!(session.suggestions().is_empty());
        assert!(!session.can_undo());
        assert_eq!(session.document(), "teh en");
    }

    #[test]
    fn setting_identical_text_keeps_analysis() {
        let mut session = analysed("teh end", vec![draft(Level::Grammar, "teh", Some("the"))]);
        session.set_text("teh end");
        assert!(session.has_analysis());
    }

    #[test]
    fn focus_level_filters_navigation() {
        let mut session = analysed(
            "one two three",
            vec![
                draft(Level::Grammar, "one", None),
                draft(Level::Structure, "two", None),
                draft(Level::Content, "three", None),
            ],
        );
        assert_eq!(session.visible_highlights(), vec![0]);
        session.set_focus_level(Level::Content);
        assert_eq!(session.visible_highlights(), vec![0, 2, 4]);
    }
}
