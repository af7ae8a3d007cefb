//! Redis-backed session store.
//!
//! Key layout: `chat:session:{session_id}` holding the whole session as one
//! JSON string. A single-key `SET` is atomic, which is what the save
//! contract relies on. Expiry and deletion of stale sessions are the
//! store operator's concern, not this subsystem's.

use async_trait::async_trait;
use chatmem_core::{Session, SessionStore, StoreError};
use redis::{AsyncCommands, aio::ConnectionManager};
use tracing::{debug, info};

const KEY_PREFIX: &str = "chat:session:";

fn session_key(session_id: &str) -> String {
    format!("{KEY_PREFIX}{session_id}")
}

/// Session persistence over a Redis connection.
///
/// The connection manager multiplexes and reconnects internally, so the
/// store is cheap to clone and share across concurrent requests.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    /// Connect to Redis at the given URL.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)
            .map_err(|e| StoreError::Unavailable(format!("invalid redis url: {e}")))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!("connected to redis session store");
        Ok(Self { conn })
    }

    /// List ids of all stored sessions.
    pub async fn list_ids(&self) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn
            .keys(format!("{KEY_PREFIX}*"))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(KEY_PREFIX).map(str::to_string))
            .collect())
    }

    /// Delete a stored session. Deleting an absent id is not an error.
    pub async fn delete(&self, session_id: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let () = conn
            .del(session_key(session_id))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        info!(session_id, "deleted session");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn fetch(&self, session_id: &str) -> Result<Session, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(session_key(session_id))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match raw {
            None => {
                debug!(session_id, "no stored session, starting fresh");
                Ok(Session::new(session_id))
            }
            Some(payload) => serde_json::from_str(&payload)
                .map_err(|e| StoreError::Serialization(e.to_string())),
        }
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        let payload = serde_json::to_string(session)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut conn = self.conn.clone();
        let () = conn
            .set(session_key(&session.id), payload)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        debug!(
            session_id = %session.id,
            messages = session.message_count(),
            "saved session"
        );
        Ok(())
    }
}
