//! Presentation decisions for spans under a focus level.
//!
//! Nothing here mutates a span. The renderer asks [`presentation`] how each
//! span should look and [`visible_highlights`] which spans can be selected.

use similar::{ChangeTag, TextDiff};

use crate::model::{Level, Span, Status};

/// Whether `span` is drawn as a highlight when the focus ceiling is `focus`.
///
/// Plain spans and rejected suggestions never are. Other suggestions are when
/// their level is at or below the ceiling.
pub fn is_visible_at_level(span: &Span, focus: Level) -> bool {
    match &span.suggestion {
        Some(s) if span.is_highlighted => s.status != Status::Rejected && s.level <= focus,
        _ => false,
    }
}

/// How one span should be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    /// Ordinary text.
    Plain,
    /// An accepted suggestion; the span text already holds the replacement.
    Accepted,
    /// A pending suggestion with replacement text, drawn as an inline diff.
    Diff { level: Level, parts: Vec<DiffPart> },
    /// A pending suggestion without replacement text.
    Flag { level: Level },
}

/// Decides the presentation of `span` under `focus`.
pub fn presentation(span: &Span, focus: Level) -> Presentation {
    if !is_visible_at_level(span, focus) {
        return Presentation::Plain;
    }
    let Some(suggestion) = &span.suggestion else {
        return Presentation::Plain;
    };
    match (suggestion.status, &suggestion.replacement) {
        (Status::Accepted, _) => Presentation::Accepted,
        (_, Some(replacement)) => Presentation::Diff {
            level: suggestion.level,
            parts: word_diff(&span.text, replacement),
        },
        (_, None) => Presentation::Flag { level: suggestion.level },
    }
}

/// Indices of spans currently drawn as highlights, in document order.
pub fn visible_highlights(spans: &[Span], focus: Level) -> Vec<usize> {
    spans
        .iter()
        .enumerate()
        .filter(|(_, span)| is_visible_at_level(span, focus))
        .map(|(index, _)| index)
        .collect()
}

/// Which side of a diff a run of text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Equal,
    Removed,
    Added,
}

/// A maximal run of text with one [`DiffKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPart {
    pub kind: DiffKind,
    pub value: String,
}

/// Word-level diff in which whitespace runs are tokens of their own.
///
/// `Equal` + `Removed` parts concatenate to `original`; `Equal` + `Added`
/// parts concatenate to `replacement`. Consecutive tokens of the same kind
/// are merged.
pub fn word_diff(original: &str, replacement: &str) -> Vec<DiffPart> {
    let diff = TextDiff::from_words(original, replacement);
    let mut parts: Vec<DiffPart> = Vec::new();

    for op in diff.ops() {
        for change in diff.iter_changes(op) {
            let kind = match change.tag() {
                ChangeTag::Equal => DiffKind::Equal,
                ChangeTag::Delete => DiffKind::Removed,
                ChangeTag::Insert => DiffKind::Added,
            };
            match parts.last_mut() {
                Some(last) if last.kind == kind => last.value.push_str(change.value()),
                _ => parts.push(DiffPart { kind, value: change.value().to_owned() }),
            }
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Suggestion, SuggestionDraft};

    fn span(level: Level, status: Status, replacement: Option<&str>) -> Span {
        let mut suggestion = Suggestion::from_draft(
            0,
            SuggestionDraft {
                level,
                original: "This are".to_owned(),
                replacement: replacement.map(str::to_owned),
                reason: "agreement".to_owned(),
            },
        );
        suggestion.status = status;
        Span::highlighted("This are", suggestion)
    }

    fn side(parts: &[DiffPart], keep: DiffKind) -> String {
        parts
            .iter()
            .filter(|p| p.kind == DiffKind::Equal || p.kind == keep)
            .map(|p| p.value.as_str())
            .collect()
    }

    #[test]
    fn plain_span_is_never_visible() {
        assert!(!is_visible_at_level(&Span::plain("text"), Level::Content));
    }

    #[test]
    fn level_above_focus_is_hidden() {
        let s = span(Level::Content, Status::Pending, Some("x"));
        assert!(s.is_highlighted);
        assert!(!is_visible_at_level(&s, Level::Grammar));
        assert!(!is_visible_at_level(&s, Level::Structure));
        assert!(is_visible_at_level(&s, Level::Content));
        assert_eq!(presentation(&s, Level::Grammar), Presentation::Plain);
    }

    #[test]
    fn focus_is_cumulative() {
        let grammar = span(Level::Grammar, Status::Pending, None);
        for focus in Level::ALL {
            assert!(is_visible_at_level(&grammar, focus));
        }
    }

    #[test]
    fn rejected_is_hidden_at_every_level() {
        let s = span(Level::Grammar, Status::Rejected, Some("This is"));
        for focus in Level::ALL {
            assert!(!is_visible_at_level(&s, focus));
        }
    }

    #[test]
    fn visibility_is_stable_across_calls() {
        let s = span(Level::Structure, Status::Pending, Some("This is"));
        let first = is_visible_at_level(&s, Level::Structure);
        assert_eq!(first, is_visible_at_level(&s, Level::Structure));
        assert_eq!(presentation(&s, Level::Structure), presentation(&s, Level::Structure));
    }

    #[test]
    fn presentation_follows_status_and_replacement() {
        assert_eq!(
            presentation(&span(Level::Grammar, Status::Accepted, Some("This is")), Level::Grammar),
            Presentation::Accepted
        );
        assert_eq!(
            presentation(&span(Level::Structure, Status::Pending, None), Level::Content),
            Presentation::Flag { level: Level::Structure }
        );
        match presentation(&span(Level::Grammar, Status::Pending, Some("This is")), Level::Grammar) {
            Presentation::Diff { level, parts } => {
                assert_eq!(level, Level::Grammar);
                assert_eq!(side(&parts, DiffKind::Removed), "This are");
                assert_eq!(side(&parts, DiffKind::Added), "This is");
            }
            other => panic!("expected diff, got {other:?}"),
        }
    }

    #[test]
    fn word_diff_keeps_whitespace_significant() {
        let parts = word_diff("a  b", "a b");
        assert_eq!(side(&parts, DiffKind::Removed), "a  b");
        assert_eq!(side(&parts, DiffKind::Added), "a b");
        assert!(parts.iter().any(|p| p.kind != DiffKind::Equal));
    }

    #[test]
    fn word_diff_marks_only_changed_words() {
        let parts = word_diff("the cat sat", "the dog sat");
        assert_eq!(
            parts,
            vec![
                DiffPart { kind: DiffKind::Equal, value: "the ".to_owned() },
                DiffPart { kind: DiffKind::Removed, value: "cat".to_owned() },
                DiffPart { kind: DiffKind::Added, value: "dog".to_owned() },
                DiffPart { kind: DiffKind::Equal, value: " sat".to_owned() },
            ]
        );
    }

    #[test]
    fn visible_highlights_skips_plain_and_filtered() {
        let spans = vec![
            span(Level::Grammar, Status::Pending, None),
            Span::plain(" "),
            span(Level::Content, Status::Pending, None),
            span(Level::Grammar, Status::Rejected, None),
            span(Level::Grammar, Status::Accepted, None),
        ];
        assert_eq!(visible_highlights(&spans, Level::Grammar), vec![0, 4]);
        assert_eq!(visible_highlights(&spans, Level::Content), vec![0, 2, 4]);
    }
}
