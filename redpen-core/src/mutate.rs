//! Accept/reject transitions over span sequences, and the undo stack.
//!
//! Mutation never edits a sequence in place: [`apply_action`] returns a fresh
//! `Vec<Span>`. Pushing the pre-mutation sequence onto [`History`] is the
//! caller's job, so test or batch mutations leave undo history alone.

use crate::model::{Span, Status, SuggestionId};

/// A reviewer decision on one suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Accept,
    Reject,
}

/// Returns a new sequence with `action` applied to every span bound to `id`.
///
/// Accepting replaces the span text with the suggestion's replacement when one
/// exists. Only pending suggestions transition; spans bound to an already
/// accepted or rejected suggestion come back unchanged, as do all other spans.
pub fn apply_action(spans: &[Span], id: &SuggestionId, action: Action) -> Vec<Span> {
    spans
        .iter()
        .map(|span| match &span.suggestion {
            Some(suggestion) if &suggestion.id == id && suggestion.is_pending() => {
                let mut suggestion = suggestion.clone();
                let text = match action {
                    Action::Accept => {
                        suggestion.status = Status::Accepted;
                        suggestion.replacement.clone().unwrap_or_else(|| span.text.clone())
                    }
                    Action::Reject => {
                        suggestion.status = Status::Rejected;
                        span.text.clone()
                    }
                };
                Span { text, suggestion: Some(suggestion), is_highlighted: span.is_highlighted }
            }
            _ => span.clone(),
        })
        .collect()
}

/// True when some span is bound to `id` and its suggestion is still pending.
pub fn has_pending(spans: &[Span], id: &SuggestionId) -> bool {
    spans
        .iter()
        .filter_map(|span| span.suggestion.as_ref())
        .any(|s| &s.id == id && s.is_pending())
}

/// The current document: every span's text concatenated in order.
pub fn document_text(spans: &[Span]) -> String {
    spans.iter().map(|span| span.text.as_str()).collect()
}

/// Undo stack of span-sequence snapshots. No redo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    snapshots: Vec<Vec<Span>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `spans` as the state to return to on the next undo.
    pub fn push(&mut self, spans: Vec<Span>) {
        self.snapshots.push(spans);
    }

    /// Removes and returns the most recent snapshot.
    pub fn pop(&mut self) -> Option<Vec<Span>> {
        self.snapshots.pop()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

/// Restores the most recent snapshot.
///
/// Returns `(restored, history)`. With an empty history the current sequence
/// is returned unchanged. The discarded current state is not kept anywhere.
pub fn undo(current: Vec<Span>, mut history: History) -> (Vec<Span>, History) {
    match history.pop() {
        Some(previous) => (previous, history),
        None => (current, history),
    }
}
