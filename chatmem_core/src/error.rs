//! Error taxonomy for the memory subsystem's collaborators.
//!
//! Store and provider failures propagate to the orchestrator's caller;
//! nothing here is retried internally. The single documented swallow is
//! the summarizer degrade path, which is why [`SummarizationFailed`] is
//! its own type rather than a provider variant.

use thiserror::Error;

/// Failures of the durable session store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store cannot be reached. Nothing was read or written.
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    /// The session could not be encoded, or stored data is malformed.
    /// Fatal per session, never for the process.
    #[error("session serialization failed: {0}")]
    Serialization(String),
}

/// Failures of the model-generation capability.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network, auth, or quota failure talking to the provider.
    #[error("request to {provider} failed: {message}")]
    Request { provider: String, message: String },

    /// The provider answered but the payload was unusable.
    #[error("{provider} returned an unusable response: {message}")]
    InvalidResponse { provider: String, message: String },

    /// The provider needs an API key that was not configured.
    #[error("{provider} requires an API key; set it in the config file or environment")]
    MissingApiKey { provider: String },
}

/// The summarizer could not produce a non-empty digest.
///
/// Non-fatal by contract: the rolling strategy degrades to a sliding
/// window for the turn and leaves the stored summary unchanged.
#[derive(Debug, Error)]
#[error("summarization failed: {reason}")]
pub struct SummarizationFailed {
    pub reason: String,
}

impl SummarizationFailed {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<ProviderError> for SummarizationFailed {
    fn from(err: ProviderError) -> Self {
        Self::new(err.to_string())
    }
}
