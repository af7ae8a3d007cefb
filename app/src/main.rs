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

mod command;

use clap::{Parser, Subcommand};
use command::{
    ChatInput, ChatStrategy, CommandStrategy, InitStrategy, SessionsInput, SessionsStrategy,
    VersionStrategy,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chatmem")]
#[command(about = "Stateful AI chat with bounded conversation memory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hold a conversation (interactive, or one-shot with -m)
    Chat {
        /// Single message to send
        #[arg(short = 'm', long)]
        message: Option<String>,

        /// Session id to continue; omit for a throwaway session
        #[arg(short = 's', long)]
        session: Option<String>,

        /// Provider: gemini | ollama
        #[arg(short = 'p', long)]
        provider: Option<String>,

        /// Memory strategy: rolling | window | none
        #[arg(long)]
        memory: Option<String>,

        /// Sliding window size (messages)
        #[arg(long)]
        window_size: Option<usize>,

        /// Message count that triggers rolling summarization
        #[arg(long)]
        threshold: Option<usize>,

        /// Messages kept verbatim after summarization
        #[arg(long)]
        keep_recent: Option<usize>,
    },
    /// List or clear stored sessions
    Sessions {
        /// Clear this session instead of listing
        #[arg(long)]
        clear: Option<String>,
    },
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            message,
            session,
            provider,
            memory,
            window_size,
            threshold,
            keep_recent,
        } => {
            ChatStrategy
                .execute(ChatInput {
                    message,
                    session,
                    provider,
                    memory,
                    window_size,
                    threshold,
                    keep_recent,
                })
                .await
        }
        Commands::Sessions { clear } => SessionsStrategy.execute(SessionsInput { clear }).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
