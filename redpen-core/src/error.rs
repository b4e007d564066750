//! Error types for redpen-core.
//!
//! Match-misses are not errors: the reconciler recovers from them and only
//! logs. Everything here surfaces to the user as a single status message.

use thiserror::Error;

/// Failure talking to the analysis provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No credential was supplied.
    #[error("an API key is required")]
    MissingApiKey,

    /// The request never produced a readable response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The model stopped because it hit the output token limit.
    #[error("the response was truncated at the token limit; try a shorter text")]
    Truncated,

    /// The response carried no message content.
    #[error("no response content from the provider")]
    EmptyContent,

    /// The body or the message content was not the expected JSON.
    #[error("invalid JSON response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failure of a session-level action.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("please enter some text to analyze")]
    EmptyText,

    #[error("please provide an API key")]
    MissingApiKey,

    #[error("an analysis is already running")]
    AnalysisInFlight,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Result alias for provider calls.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_messages_are_user_facing() {
        let err = ProviderError::Status { status: 401, message: "Incorrect API key".into() };
        assert_eq!(err.to_string(), "API error (401): Incorrect API key");
        assert!(ProviderError::Truncated.to_string().contains("truncated"));
    }

    #[test]
    fn session_wraps_provider_transparently() {
        let err = SessionError::from(ProviderError::EmptyContent);
        assert_eq!(err.to_string(), "no response content from the provider");
    }
}
