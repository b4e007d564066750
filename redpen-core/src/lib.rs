//! redpen-core: reconciliation of model-issued edit suggestions onto text.
//!
//! The pipeline is: provider response → [`model::ingest`] → [`reconcile`] →
//! span sequence → [`mutate`] on reviewer decisions → [`filter`] for what the
//! renderer shows. [`session::Session`] owns the state between those steps and
//! [`provider::OpenAiClient`] is the only code that talks to the network.

pub mod error;
pub mod filter;
pub mod model;
pub mod mutate;
pub mod provider;
pub mod reconcile;
pub mod session;

pub use error::{ProviderError, SessionError};
pub use model::{Level, Span, Status, Suggestion, SuggestionDraft, SuggestionId};
pub use reconcile::reconcile;
pub use session::{AnalysisOutcome, AnalysisTicket, Session};
