//! Conversation compression via the model-generation capability.

use std::fmt::Write;
use std::sync::Arc;

use chatmem_core::{Message, ModelProvider, Role, SummarizationFailed};
use tracing::debug;

const SUMMARY_INSTRUCTION: &str = "Condense the following conversation into a short paragraph.\n\
     Requirements:\n\
     - Preserve named entities, stated facts, goals, constraints, and decisions\n\
     - Incorporate the prior summary if one is given\n\
     - Do not invent details\n\
     Output only the summary, with no preamble.";

/// Compresses a batch of evicted turns into a short digest.
///
/// Issues exactly one model call per [`summarize`](Summarizer::summarize).
/// The provider is injected so strategies can be exercised with a scripted
/// fake in tests.
pub struct Summarizer {
    provider: Arc<dyn ModelProvider>,
}

impl Summarizer {
    #[must_use]
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    /// Condense `messages` (plus any prior summary, folded in as context so
    /// repeated passes do not silently drop earlier facts) into a non-empty
    /// digest.
    pub async fn summarize(
        &self,
        prior_summary: Option<&str>,
        messages: &[Message],
    ) -> Result<String, SummarizationFailed> {
        if messages.is_empty() && prior_summary.is_none() {
            return Err(SummarizationFailed::new("nothing to summarize"));
        }

        let prompt = Self::build_prompt(prior_summary, messages);
        debug!(batch = messages.len(), "requesting summary");

        let request = vec![Message::new(Role::User, prompt)];
        let reply = self.provider.generate(&request).await?;

        let summary = reply.trim();
        if summary.is_empty() {
            return Err(SummarizationFailed::new("provider returned empty summary"));
        }

        Ok(summary.to_string())
    }

    fn build_prompt(prior_summary: Option<&str>, messages: &[Message]) -> String {
        let mut prompt = String::from(SUMMARY_INSTRUCTION);
        prompt.push_str("\n\n");

        if let Some(prior) = prior_summary {
            let prior = prior.trim();
            if !prior.is_empty() {
                let _ = write!(prompt, "Prior summary:\n{prior}\n\n");
            }
        }

        prompt.push_str("Conversation:\n");
        for m in messages {
            let _ = writeln!(prompt, "{}: {}", m.role.label(), m.content);
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chatmem_core::ProviderError;

    struct FixedProvider {
        reply: String,
    }

    #[async_trait]
    impl ModelProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _messages: &[Message]) -> Result<String, ProviderError> {
            Ok(self.reply.clone())
        }
    }

    fn messages() -> Vec<Message> {
        vec![
            Message::new(Role::User, "my name is Ada"),
            Message::new(Role::Assistant, "nice to meet you, Ada"),
        ]
    }

    #[tokio::test]
    async fn returns_trimmed_summary() {
        let summarizer = Summarizer::new(Arc::new(FixedProvider {
            reply: "  Ada introduced herself.  ".to_string(),
        }));

        let summary = summarizer.summarize(None, &messages()).await;
        assert_eq!(summary.as_deref().ok(), Some("Ada introduced herself."));
    }

    #[tokio::test]
    async fn empty_output_is_a_failure() {
        let summarizer = Summarizer::new(Arc::new(FixedProvider {
            reply: "   ".to_string(),
        }));

        let result = summarizer.summarize(None, &messages()).await;
        assert!(result.is_err());
    }

    #[test]
    fn prompt_folds_in_prior_summary() {
        let prompt = Summarizer::build_prompt(Some("Ada likes Rust."), &messages());

        assert!(prompt.contains("Prior summary:\nAda likes Rust."));
        assert!(prompt.contains("USER: my name is Ada"));
        assert!(prompt.contains("ASSISTANT: nice to meet you, Ada"));
    }
}
