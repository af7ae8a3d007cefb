//! Inspect or clear stored sessions.

use chatmem_config::Config;
use chatmem_store::RedisSessionStore;

use super::CommandStrategy;

/// Input parameters for the Sessions command strategy.
#[derive(Debug, Clone)]
pub struct SessionsInput {
    /// Clear this session id instead of listing.
    pub clear: Option<String>,
}

/// Strategy for listing and clearing stored sessions.
#[derive(Debug, Clone, Copy)]
pub struct SessionsStrategy;

impl CommandStrategy for SessionsStrategy {
    type Input = SessionsInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let store = RedisSessionStore::connect(&config.store.redis_url).await?;

        if let Some(session_id) = input.clear {
            store.delete(&session_id).await?;
            println!("Cleared session: {session_id}");
            return Ok(());
        }

        let mut ids = store.list_ids().await?;
        ids.sort();

        if ids.is_empty() {
            println!("No stored sessions.");
        } else {
            for id in ids {
                println!("{id}");
            }
        }

        Ok(())
    }
}
