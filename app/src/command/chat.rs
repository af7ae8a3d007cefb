//! Multi-turn conversation command.
//!
//! One-shot mode sends a single message; interactive mode keeps the
//! session id fixed across turns so context accumulates through the
//! store on every request, exactly as an API caller would experience it.

use std::io::Write;

use chatmem_config::Config;
use chatmem_conversation::{ChatRequest, ChatService};
use chatmem_memory::MemoryStrategy;
use tracing::info;
use uuid::Uuid;

use super::{CommandStrategy, build_memory_strategy, build_provider, build_store};

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
    /// Optional session id to continue (durable via Redis)
    pub session: Option<String>,
    /// Optional provider override
    pub provider: Option<String>,
    /// Optional memory strategy override
    pub memory: Option<String>,
    pub window_size: Option<usize>,
    pub threshold: Option<usize>,
    pub keep_recent: Option<usize>,
}

/// Strategy for executing the Chat command.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        let provider = build_provider(&config, input.provider.as_deref())?;
        let memory = build_memory_strategy(
            &config,
            input.memory.as_deref(),
            input.window_size,
            input.threshold,
            input.keep_recent,
        );
        let store = build_store(&config, input.session.is_some()).await?;

        let service = ChatService::new(store, provider);

        if let Some(message) = input.message {
            // One-shot: a named session continues durably, an unnamed one
            // is a throwaway single turn.
            let reply = service
                .converse(ChatRequest {
                    session_id: input.session,
                    prompt: message,
                    memory,
                })
                .await?;

            println!("{}", reply.text);
            info!(turn = reply.turn_number, "turn completed");
        } else {
            let session_id = input
                .session
                .unwrap_or_else(|| format!("cli:{}", Uuid::now_v7()));
            run_interactive(&service, &session_id, memory).await?;
        }

        Ok(())
    }
}

async fn run_interactive(
    service: &ChatService,
    session_id: &str,
    memory: MemoryStrategy,
) -> anyhow::Result<()> {
    println!("=== Conversation session: {session_id} ===");
    println!(
        "Memory strategy: {}. Type 'exit' or 'quit' to end.\n",
        memory.name()
    );

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if matches!(input, "exit" | "quit" | "q") {
            break;
        }
        if input.is_empty() {
            continue;
        }

        let request = ChatRequest {
            session_id: Some(session_id.to_string()),
            prompt: input.to_string(),
            memory,
        };

        match service.converse(request).await {
            Ok(reply) => {
                println!("\n{}\n", reply.text);
                info!(turn = reply.turn_number, "turn completed");
            }
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    Ok(())
}
