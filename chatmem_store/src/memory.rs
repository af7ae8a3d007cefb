//! In-process session store for tests and throwaway sessions.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chatmem_core::{Session, SessionStore, StoreError};
use tokio::sync::RwLock;

/// `SessionStore` over a shared map. Same contract as the Redis store,
/// minus durability: full-overwrite saves, lazy creation on fetch.
#[derive(Clone, Default)]
pub struct MemoryStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn fetch(&self, session_id: &str) -> Result<Session, StoreError> {
        Ok(self
            .sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_else(|| Session::new(session_id)))
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatmem_core::Role;

    #[tokio::test]
    async fn fetch_of_unknown_id_is_an_empty_session() -> Result<(), StoreError> {
        let store = MemoryStore::new();

        let session = store.fetch("never-seen").await?;
        assert!(session.is_empty());
        assert_eq!(session.id, "never-seen");
        // Fetch alone does not create anything.
        assert!(store.is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn save_then_fetch_round_trips() -> Result<(), StoreError> {
        let store = MemoryStore::new();

        let mut session = store.fetch("s1").await?;
        session.append(Role::User, "hello");
        session.append(Role::Assistant, "hi there");
        session.summary = Some("greeting exchanged".to_string());
        store.save(&session).await?;

        let loaded = store.fetch("s1").await?;
        assert_eq!(loaded.messages, session.messages);
        assert_eq!(loaded.summary, session.summary);
        Ok(())
    }

    #[tokio::test]
    async fn save_is_a_full_overwrite() -> Result<(), StoreError> {
        let store = MemoryStore::new();

        let mut session = store.fetch("s1").await?;
        session.append(Role::User, "one");
        session.append(Role::User, "two");
        store.save(&session).await?;

        let mut replacement = Session::new("s1");
        replacement.append(Role::User, "only");
        store.save(&replacement).await?;

        let loaded = store.fetch("s1").await?;
        assert_eq!(loaded.message_count(), 1);
        assert_eq!(loaded.messages[0].content, "only");
        Ok(())
    }
}
