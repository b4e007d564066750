//! Suggestion-to-span reconciliation.
//!
//! Partitions the source text into an ordered span sequence with a single
//! left-to-right scan. Each suggestion's `original` is searched for at or after
//! the end of the previous match, so every match consumes one occurrence and no
//! two highlights can overlap. A suggestion whose text only occurs before an
//! already-claimed region is never matched.
//!
//! Offsets are UTF-8 byte offsets. Matches are whole substrings of `text`, so
//! every slice boundary is a char boundary.

use tracing::warn;

use crate::model::{Span, Suggestion, SuggestionId};

/// Spans for a text plus the suggestions that could not be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub spans: Vec<Span>,
    /// Ids of suggestions whose `original` was not found at or after the scan
    /// cursor, in input order.
    pub misses: Vec<SuggestionId>,
}

/// Builds the span sequence for `text` from `suggestions` in input order.
///
/// Suggestions with an empty `original` are skipped silently. Suggestions that
/// fail to match are skipped and logged at `warn`.
pub fn reconcile(text: &str, suggestions: &[Suggestion]) -> Vec<Span> {
    reconcile_with_report(text, suggestions).spans
}

/// Like [`reconcile`], also reporting which suggestions missed.
pub fn reconcile_with_report(text: &str, suggestions: &[Suggestion]) -> Reconciliation {
    if suggestions.is_empty() {
        return Reconciliation { spans: vec![Span::plain(text)], misses: Vec::new() };
    }

    let mut spans = Vec::with_capacity(suggestions.len() * 2 + 1);
    let mut misses = Vec::new();
    let mut last_index = 0;
    let mut search_from = 0;

    for suggestion in suggestions {
        let original = suggestion.original.as_str();
        if original.is_empty() {
            continue;
        }

        let Some(offset) = text[search_from..].find(original) else {
            warn!(
                id = %suggestion.id,
                original,
                search_from,
                "suggestion text not found, dropping highlight"
            );
            misses.push(suggestion.id.clone());
            continue;
        };

        let start = search_from + offset;
        let end = start + original.len();

        if start > last_index {
            spans.push(Span::plain(&text[last_index..start]));
        }
        spans.push(Span::highlighted(&text[start..end], suggestion.clone()));

        last_index = end;
        search_from = end;
    }

    if last_index < text.len() {
        spans.push(Span::plain(&text[last_index..]));
    }

    Reconciliation { spans, misses }
}
