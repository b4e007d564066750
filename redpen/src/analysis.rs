//! Background analysis task.
//!
//! The provider call runs on its own tokio task so the render loop keeps
//! drawing while the request is in flight. The result comes back over the
//! event channel as `AppEvent::AnalysisResult` together with the ticket it
//! was started for; the session decides whether it still applies.

use std::sync::Arc;

use redpen_core::provider::OpenAiClient;
use redpen_core::{AnalysisTicket, ProviderError, SuggestionDraft};
use tokio::sync::mpsc::UnboundedSender;

use crate::event::AppEvent;

/// A finished provider call.
#[derive(Debug)]
pub struct AnalysisPayload {
    pub ticket: AnalysisTicket,
    pub result: Result<Vec<SuggestionDraft>, ProviderError>,
}

/// Starts the provider call for `ticket` and reports back on `event_tx`.
///
/// The send fails only when the main loop has already exited, in which case
/// the result has nowhere to go and is dropped.
pub fn spawn_analysis(
    client: Arc<OpenAiClient>,
    ticket: AnalysisTicket,
    api_key: String,
    event_tx: UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        tracing::debug!(generation = ticket.generation(), model = %client.config().model, "requesting suggestions");
        let result = client.analyze(ticket.text(), &api_key).await;
        let payload = AnalysisPayload { ticket, result };
        if event_tx.send(AppEvent::AnalysisResult(Box::new(payload))).is_err() {
            tracing::debug!("event loop gone, dropping analysis result");
        }
    });
}
