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

//! Model providers: the opaque `generate(history) -> text` capability.
//!
//! Two backends are supported, selected per request by [`ProviderKind`]:
//! Google Gemini (cloud, API key) and Ollama (local). Failures surface as
//! `ProviderError`; no retry happens at this layer, callers wrap their own
//! policy if they want one.

mod gemini;
mod ollama;

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

/// Which model backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Ollama,
}

impl ProviderKind {
    /// Parse a caller-supplied provider name.
    ///
    /// Empty input defaults to Gemini; `local` is an alias for Ollama.
    /// Returns `None` for anything else so callers can reject the request.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "gemini" | "" => Some(Self::Gemini),
            "ollama" | "local" => Some(Self::Ollama),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
        }
    }
}
