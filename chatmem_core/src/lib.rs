#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Shared types and trait seams for bounded-memory conversations.
//!
//! All durable state lives behind the [`SessionStore`] trait; the model
//! backend is an opaque [`ModelProvider`]. Both are injected so the
//! orchestration and strategy layers can be tested without Redis or a
//! live model.

use async_trait::async_trait;

mod error;
mod session;
mod tokens;

pub use error::{ProviderError, StoreError, SummarizationFailed};
pub use session::{Message, Role, Session};
pub use tokens::estimate_tokens;

/// Durable key-value persistence of a session's messages and summary.
///
/// A `save` is a full overwrite of the stored representation. Provided the
/// backing store offers atomic single-key writes, a torn write leaves either
/// the old or the new complete state, never a mix.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the stored session, or an empty one if the id has never been
    /// seen. Absence is not an error (lazy creation).
    async fn fetch(&self, session_id: &str) -> Result<Session, StoreError>;

    /// Overwrite the stored representation of the session.
    async fn save(&self, session: &Session) -> Result<(), StoreError>;
}

/// Opaque model-generation capability.
///
/// Latency, rate limits, and determinism are the provider's own business;
/// callers only see text out or [`ProviderError`].
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Short stable name for logs and replies (`"gemini"`, `"ollama"`).
    fn name(&self) -> &str;

    /// Generate a reply for the given managed history.
    async fn generate(&self, messages: &[Message]) -> Result<String, ProviderError>;
}
