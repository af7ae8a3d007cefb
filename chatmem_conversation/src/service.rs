//! The fetch → manage → generate → append → save sequence.

use std::sync::Arc;

use chatmem_core::{Message, ModelProvider, ProviderError, Role, Session, SessionStore, StoreError};
use chatmem_memory::{MemoryStrategy, Summarizer};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Errors surfaced to the orchestrator's caller.
///
/// The variants carry enough to distinguish "your message was not saved"
/// from "your message was saved but no reply was generated".
#[derive(Debug, Error)]
pub enum ChatError {
    /// The store failed. On fetch, nothing happened yet; on save, the
    /// exchange was not persisted.
    #[error("session store error: {0}")]
    Store(#[from] StoreError),

    /// The model call failed. `state_saved` tells the caller whether the
    /// user's turn (and any compaction) made it to the store anyway.
    #[error("model call failed ({}): {source}", saved_note(*.state_saved))]
    Provider {
        #[source]
        source: ProviderError,
        state_saved: bool,
    },

    /// The model answered with empty text. Treated like a provider
    /// failure so an empty assistant turn never enters the history.
    #[error("model returned an empty reply ({})", saved_note(*.state_saved))]
    EmptyReply { state_saved: bool },
}

const fn saved_note(state_saved: bool) -> &'static str {
    if state_saved {
        "your message was saved"
    } else {
        "your message was not saved"
    }
}

/// One turn's worth of caller input.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Session to continue. `None` means a throwaway single-turn session
    /// with no persistence.
    pub session_id: Option<String>,
    /// The new user message.
    pub prompt: String,
    /// Memory policy for this turn.
    pub memory: MemoryStrategy,
}

/// One turn's worth of output.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub text: String,
    /// Echoes the request's session id; `None` for throwaway turns.
    pub session_id: Option<String>,
    pub provider: String,
    /// Completed exchanges in the session after this turn.
    pub turn_number: usize,
}

/// Stateless per-request orchestrator.
///
/// Store and provider are injected (spec'd seams, fakeable in tests); the
/// summarizer reuses the same provider, matching how the original service
/// summarized with whichever model the caller picked.
pub struct ChatService {
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn ModelProvider>,
    summarizer: Summarizer,
}

impl ChatService {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, provider: Arc<dyn ModelProvider>) -> Self {
        let summarizer = Summarizer::new(provider.clone());
        Self {
            store,
            provider,
            summarizer,
        }
    }

    /// Run one conversation turn.
    ///
    /// The pass is linear: `Fetched -> Managed -> Replied -> Saved`. A
    /// provider failure short-circuits after attempting to persist the
    /// pre-reply state, so the user's turn is not silently lost.
    pub async fn converse(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        let Some(session_id) = request.session_id else {
            return self.throwaway_turn(&request.prompt).await;
        };

        // Fetch first: if the store is down we fail here, before any
        // provider call is attempted or paid for.
        let mut session = self.store.fetch(&session_id).await?;
        info!(
            %session_id,
            stored_messages = session.message_count(),
            memory = request.memory.name(),
            "processing turn"
        );

        session.append(Role::User, request.prompt);

        let managed = request.memory.select(&mut session, &self.summarizer).await;
        debug!(
            managed_len = managed.len(),
            estimated_tokens = managed.estimated_tokens(),
            "history managed"
        );

        let reply = match self.provider.generate(managed.messages()).await {
            Ok(text) => text.trim().to_string(),
            Err(source) => {
                let state_saved = self.try_save_partial(&session).await;
                return Err(ChatError::Provider {
                    source,
                    state_saved,
                });
            }
        };

        if reply.is_empty() {
            let state_saved = self.try_save_partial(&session).await;
            return Err(ChatError::EmptyReply { state_saved });
        }

        session.append(Role::Assistant, reply.clone());
        self.save_detached(session.clone()).await?;

        Ok(ChatReply {
            text: reply,
            session_id: Some(session_id),
            provider: self.provider.name().to_string(),
            turn_number: session.turn_count(),
        })
    }

    /// Single-turn session with no persistence: the provider sees just the
    /// new user message. A generated id tags the turn in logs.
    async fn throwaway_turn(&self, prompt: &str) -> Result<ChatReply, ChatError> {
        let ephemeral_id = Uuid::now_v7();
        info!(%ephemeral_id, "processing throwaway turn");

        let history = vec![Message::new(Role::User, prompt)];
        let reply = self
            .provider
            .generate(&history)
            .await
            .map_err(|source| ChatError::Provider {
                source,
                state_saved: false,
            })?
            .trim()
            .to_string();

        if reply.is_empty() {
            return Err(ChatError::EmptyReply { state_saved: false });
        }

        Ok(ChatReply {
            text: reply,
            session_id: None,
            provider: self.provider.name().to_string(),
            turn_number: 1,
        })
    }

    /// Persist the session on a spawned task, so a caller that aborts
    /// mid-request cannot cancel a save for a reply already produced.
    async fn save_detached(&self, session: Session) -> Result<(), StoreError> {
        let store = self.store.clone();
        tokio::spawn(async move { store.save(&session).await })
            .await
            .map_err(|e| StoreError::Unavailable(format!("save task failed: {e}")))?
    }

    /// Best-effort save of the pre-reply state after a provider failure.
    /// The strategy may already have compacted the session, and the user's
    /// message deserves to survive even without a reply.
    async fn try_save_partial(&self, session: &Session) -> bool {
        match self.store.save(session).await {
            Ok(()) => true,
            Err(e) => {
                warn!(session_id = %session.id, error = %e, "failed to save pre-reply state");
                false
            }
        }
    }
}
