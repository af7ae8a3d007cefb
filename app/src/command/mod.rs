//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type, dispatched
//! statically from `main`. Shared construction of the provider, store, and
//! memory strategy lives here so the command bodies stay small.

use std::sync::Arc;

use chatmem_config::Config;
use chatmem_core::{ModelProvider, SessionStore};
use chatmem_memory::{MemoryChoice, MemoryStrategy};
use chatmem_providers::{GeminiProvider, OllamaProvider, ProviderKind};
use chatmem_store::{MemoryStore, RedisSessionStore};
use tracing::info;

mod chat;
mod init;
mod sessions;
mod version;

pub use chat::{ChatInput, ChatStrategy};
pub use init::InitStrategy;
pub use sessions::{SessionsInput, SessionsStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// Each strategy defines its own input type, enabling type-safe parameter
/// passing without runtime casting or boxing; all calls are monomorphized.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Resolve the provider for this invocation, built lazily so an
/// Ollama-only setup never needs a Gemini key.
fn build_provider(
    config: &Config,
    requested: Option<&str>,
) -> anyhow::Result<Arc<dyn ModelProvider>> {
    let name = requested.unwrap_or(&config.providers.default);
    let kind = ProviderKind::parse(name)
        .ok_or_else(|| anyhow::anyhow!("Provider must be 'gemini' or 'ollama', got '{name}'"))?;

    info!(provider = kind.as_str(), "using provider");

    match kind {
        ProviderKind::Gemini => {
            let gemini = GeminiProvider::new(
                config.providers.gemini.api_key.clone(),
                config.providers.gemini.model.clone(),
            )?;
            Ok(Arc::new(gemini))
        }
        ProviderKind::Ollama => Ok(Arc::new(OllamaProvider::new(
            &config.providers.ollama.host,
            config.providers.ollama.model.clone(),
        ))),
    }
}

/// Resolve the memory strategy from the request, falling back to config.
fn build_memory_strategy(
    config: &Config,
    requested: Option<&str>,
    window_size: Option<usize>,
    threshold: Option<usize>,
    keep_recent: Option<usize>,
) -> MemoryStrategy {
    let choice = MemoryChoice::parse(requested.unwrap_or(&config.memory.strategy));
    MemoryStrategy::from_choice(
        choice,
        window_size.unwrap_or(config.memory.window_size),
        threshold.unwrap_or(config.memory.threshold),
        keep_recent.unwrap_or(config.memory.keep_recent),
    )
}

/// Durable store for named sessions; in-process store otherwise, so a
/// throwaway or unnamed interactive session needs no Redis at all.
async fn build_store(config: &Config, durable: bool) -> anyhow::Result<Arc<dyn SessionStore>> {
    if durable {
        let store = RedisSessionStore::connect(&config.store.redis_url).await?;
        Ok(Arc::new(store))
    } else {
        Ok(Arc::new(MemoryStore::new()))
    }
}
