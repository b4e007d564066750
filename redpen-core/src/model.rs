//! Suggestion and span data shapes shared by every redpen component.
//!
//! All types are fully owned so a span sequence can be snapshotted onto the
//! undo stack with a plain `clone()` and sent across the analysis task
//! boundary without lifetimes.

use std::fmt;

use serde::Deserialize;

/// Severity category of a suggestion.
///
/// Levels are ordered: a focus ceiling of `Content` shows all three, a ceiling
/// of `Grammar` shows only grammar suggestions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum Level {
    /// Spelling, punctuation, agreement.
    #[default]
    Grammar = 1,
    /// Sentence flow, cohesion, redundancy.
    Structure = 2,
    /// Argument, clarity, supporting evidence.
    Content = 3,
}

impl Level {
    /// Every level in ascending order.
    pub const ALL: [Level; 3] = [Level::Grammar, Level::Structure, Level::Content];

    /// Short human label shown in the focus bar and detail panel.
    pub fn label(self) -> &'static str {
        match self {
            Level::Grammar => "Grammar",
            Level::Structure => "Structure",
            Level::Content => "Content",
        }
    }

    /// Numeric value as sent by the provider (1..=3).
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The next wider ceiling. Saturates at `Content`.
    pub fn next(self) -> Self {
        match self {
            Level::Grammar => Level::Structure,
            Level::Structure | Level::Content => Level::Content,
        }
    }

    /// The next narrower ceiling. Saturates at `Grammar`.
    pub fn prev(self) -> Self {
        match self {
            Level::Grammar | Level::Structure => Level::Grammar,
            Level::Content => Level::Structure,
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Level::Grammar),
            2 => Ok(Level::Structure),
            3 => Ok(Level::Content),
            other => Err(format!("suggestion level must be 1, 2 or 3, got {other}")),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Review state of a suggestion.
///
/// `Pending` is the only state with outgoing transitions. Returning from
/// `Accepted` or `Rejected` happens only by restoring an earlier snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Accepted => "accepted",
            Status::Rejected => "rejected",
        }
    }
}

/// Batch-unique suggestion identifier, `"{index}-{original}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuggestionId(String);

impl SuggestionId {
    /// Builds the id for the suggestion at `index` in the provider response.
    pub fn new(index: usize, original: &str) -> Self {
        Self(format!("{index}-{original}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SuggestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One suggestion record exactly as the analysis provider returns it.
///
/// `original` defaults to empty when the provider omits it; such drafts are
/// kept in the suggestion list but never produce a span.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SuggestionDraft {
    pub level: Level,
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub replacement: Option<String>,
    #[serde(default)]
    pub reason: String,
}

/// A provider-issued edit proposal with its review state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub id: SuggestionId,
    pub status: Status,
    pub level: Level,
    /// Exact substring the suggestion targets.
    pub original: String,
    /// Improved text. `None` means flag only; `Some("")` means delete.
    pub replacement: Option<String>,
    pub reason: String,
}

impl Suggestion {
    /// Creates a pending suggestion from the draft at `index` in its batch.
    pub fn from_draft(index: usize, draft: SuggestionDraft) -> Self {
        Self {
            id: SuggestionId::new(index, &draft.original),
            status: Status::Pending,
            level: draft.level,
            original: draft.original,
            replacement: draft.replacement,
            reason: draft.reason,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }
}

/// Turns a provider response into pending suggestions with batch-unique ids.
pub fn ingest(drafts: Vec<SuggestionDraft>) -> Vec<Suggestion> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| Suggestion::from_draft(index, draft))
        .collect()
}

/// A contiguous run of document text, optionally bound to one suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Text this span currently renders. Changes when its suggestion is accepted.
    pub text: String,
    pub suggestion: Option<Suggestion>,
    /// True iff the span was carved out for a matched suggestion.
    pub is_highlighted: bool,
}

impl Span {
    /// An unflagged run of text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), suggestion: None, is_highlighted: false }
    }

    /// A run of text claimed by `suggestion`.
    pub fn highlighted(text: impl Into<String>, suggestion: Suggestion) -> Self {
        Self { text: text.into(), suggestion: Some(suggestion), is_highlighted: true }
    }

    /// True when this span is bound to the suggestion with `id`.
    pub fn is_bound_to(&self, id: &SuggestionId) -> bool {
        self.suggestion.as_ref().is_some_and(|s| &s.id == id)
    }
}
