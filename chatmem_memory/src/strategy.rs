//! The three-way memory policy and its selection logic.

use chatmem_core::{Message, Role, Session};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::managed::ManagedHistory;
use crate::summarizer::Summarizer;

/// Which policy a caller asked for, before sizes are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryChoice {
    None,
    Window,
    Rolling,
}

impl MemoryChoice {
    /// Parse a caller-supplied strategy name.
    ///
    /// Unknown or empty input falls back to `Rolling`, the safe default
    /// for long conversations.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "window" => Self::Window,
            _ => Self::Rolling,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Window => "window",
            Self::Rolling => "rolling",
        }
    }
}

/// A memory policy with its sizes attached.
///
/// `select` is the single dispatch point: given the session as it stands
/// after the new user message was appended, it returns the managed history
/// for this turn and, for `RollingSummary`, compacts the session in place
/// as part of the same turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryStrategy {
    /// Identity: full history, unbounded growth accepted by the caller.
    None,
    /// The most recent `window_size` messages, in original order. Storage
    /// is never compacted and any stored summary is ignored entirely.
    SlidingWindow { window_size: usize },
    /// Behaves like `None` until history outgrows `threshold`; then the
    /// messages older than the last `keep_recent` are condensed into the
    /// session summary and evicted from storage.
    RollingSummary { threshold: usize, keep_recent: usize },
}

impl MemoryStrategy {
    /// Attach configured sizes to a parsed choice.
    #[must_use]
    pub const fn from_choice(
        choice: MemoryChoice,
        window_size: usize,
        threshold: usize,
        keep_recent: usize,
    ) -> Self {
        match choice {
            MemoryChoice::None => Self::None,
            MemoryChoice::Window => Self::SlidingWindow { window_size },
            MemoryChoice::Rolling => Self::RollingSummary {
                threshold,
                keep_recent,
            },
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::SlidingWindow { .. } => "window",
            Self::RollingSummary { .. } => "rolling",
        }
    }

    /// Decide what to send to the model this turn.
    ///
    /// Insertion order is authoritative for "most recent"; timestamps are
    /// never consulted, so the result is deterministic under clock skew.
    /// Only `RollingSummary` may mutate the session, and only within this
    /// call. If the summarizer fails, the rolling strategy degrades to a
    /// `SlidingWindow { keep_recent }` selection for the turn: history
    /// stays bounded, the stored summary and messages stay untouched, and
    /// the failure is logged at warn level instead of surfacing.
    pub async fn select(&self, session: &mut Session, summarizer: &Summarizer) -> ManagedHistory {
        match *self {
            Self::None => Self::full_history(session),
            Self::SlidingWindow { window_size } => {
                ManagedHistory::new(session.last_n(window_size).to_vec())
            }
            Self::RollingSummary {
                threshold,
                keep_recent,
            } => {
                if session.message_count() <= threshold {
                    return Self::full_history(session);
                }
                Self::roll_up(session, summarizer, keep_recent).await
            }
        }
    }

    /// Everything we have, with any existing summary folded in as a
    /// leading system message.
    fn full_history(session: &Session) -> ManagedHistory {
        let mut messages = Vec::with_capacity(session.message_count() + 1);
        if let Some(msg) = summary_message(session.summary.as_deref()) {
            messages.push(msg);
        }
        messages.extend_from_slice(&session.messages);
        ManagedHistory::new(messages)
    }

    async fn roll_up(
        session: &mut Session,
        summarizer: &Summarizer,
        keep_recent: usize,
    ) -> ManagedHistory {
        let cut = session.message_count().saturating_sub(keep_recent);
        let older = session.messages[..cut].to_vec();
        debug!(
            session_id = %session.id,
            evicting = older.len(),
            keep_recent,
            "history over threshold, summarizing older turns"
        );

        match summarizer
            .summarize(session.summary.as_deref(), &older)
            .await
        {
            Ok(summary) => {
                // Compaction happens in the same orchestrator turn that
                // triggered it; the save at the end of the turn persists it.
                session.compact(summary.clone(), keep_recent);

                let mut messages = Vec::with_capacity(session.message_count() + 1);
                if let Some(msg) = summary_message(Some(&summary)) {
                    messages.push(msg);
                }
                messages.extend_from_slice(&session.messages);
                ManagedHistory::new(messages)
            }
            Err(err) => {
                warn!(
                    session_id = %session.id,
                    error = %err,
                    "summarization failed, degrading to sliding window for this turn"
                );
                ManagedHistory::new(session.last_n(keep_recent).to_vec())
            }
        }
    }
}

/// Wrap a summary as a synthetic system message, if it carries any text.
fn summary_message(summary: Option<&str>) -> Option<Message> {
    let summary = summary?.trim();
    if summary.is_empty() {
        return None;
    }
    Some(Message::new(
        Role::System,
        format!("Summary of the conversation so far: {summary}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chatmem_core::{ModelProvider, ProviderError};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedProvider {
        reply: Option<String>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn summarizing(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, _messages: &[Message]) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().ok_or_else(|| ProviderError::Request {
                provider: "scripted".to_string(),
                message: "forced failure".to_string(),
            })
        }
    }

    fn session_with(count: usize) -> Session {
        let mut session = Session::new("test");
        for i in 0..count {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            session.append(role, format!("message {i}"));
        }
        session
    }

    fn idle_summarizer() -> (Arc<ScriptedProvider>, Summarizer) {
        let provider = ScriptedProvider::failing();
        let summarizer = Summarizer::new(provider.clone());
        (provider, summarizer)
    }

    #[test]
    fn choice_parsing_defaults_to_rolling() {
        assert_eq!(MemoryChoice::parse("none"), MemoryChoice::None);
        assert_eq!(MemoryChoice::parse(" Window "), MemoryChoice::Window);
        assert_eq!(MemoryChoice::parse("rolling"), MemoryChoice::Rolling);
        assert_eq!(MemoryChoice::parse(""), MemoryChoice::Rolling);
        assert_eq!(MemoryChoice::parse("bogus"), MemoryChoice::Rolling);
    }

    #[tokio::test]
    async fn none_returns_full_history() {
        let (provider, summarizer) = idle_summarizer();
        let mut session = session_with(7);

        let managed = MemoryStrategy::None.select(&mut session, &summarizer).await;

        assert_eq!(managed.len(), 7);
        assert_eq!(session.message_count(), 7);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn window_returns_min_of_n_and_len_in_order() {
        let (_, summarizer) = idle_summarizer();

        for (n, len, expected) in [(3, 10, 3), (10, 4, 4), (5, 5, 5)] {
            let mut session = session_with(len);
            let strategy = MemoryStrategy::SlidingWindow { window_size: n };
            let managed = strategy.select(&mut session, &summarizer).await;

            assert_eq!(managed.len(), expected);
            // Original order, most recent suffix.
            let first = &managed.messages()[0].content;
            assert_eq!(first, &format!("message {}", len - expected));
            // Window never compacts storage.
            assert_eq!(session.message_count(), len);
        }
    }

    #[tokio::test]
    async fn window_of_zero_is_a_stateless_turn() {
        let (_, summarizer) = idle_summarizer();
        let mut session = session_with(4);

        let strategy = MemoryStrategy::SlidingWindow { window_size: 0 };
        let managed = strategy.select(&mut session, &summarizer).await;

        assert!(managed.is_empty());
    }

    #[tokio::test]
    async fn window_ignores_stored_summary() {
        let (_, summarizer) = idle_summarizer();
        let mut session = session_with(4);
        session.summary = Some("should not appear".to_string());

        let strategy = MemoryStrategy::SlidingWindow { window_size: 2 };
        let managed = strategy.select(&mut session, &summarizer).await;

        assert_eq!(managed.len(), 2);
        assert!(managed.messages().iter().all(|m| m.role != Role::System));
    }

    #[tokio::test]
    async fn window_select_is_idempotent() {
        let (_, summarizer) = idle_summarizer();
        let mut session = session_with(9);
        let strategy = MemoryStrategy::SlidingWindow { window_size: 4 };

        let first = strategy.select(&mut session, &summarizer).await;
        let second = strategy.select(&mut session, &summarizer).await;

        assert_eq!(first.messages(), second.messages());
    }

    #[tokio::test]
    async fn rolling_below_threshold_behaves_like_none() {
        let (provider, summarizer) = idle_summarizer();
        let mut session = session_with(4);

        let strategy = MemoryStrategy::RollingSummary {
            threshold: 4,
            keep_recent: 2,
        };
        let managed = strategy.select(&mut session, &summarizer).await;

        assert_eq!(managed.len(), 4);
        assert_eq!(session.message_count(), 4);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn rolling_below_threshold_still_carries_existing_summary() {
        let (_, summarizer) = idle_summarizer();
        let mut session = session_with(3);
        session.summary = Some("facts from earlier".to_string());

        let strategy = MemoryStrategy::RollingSummary {
            threshold: 4,
            keep_recent: 2,
        };
        let managed = strategy.select(&mut session, &summarizer).await;

        assert_eq!(managed.len(), 4);
        assert_eq!(managed.messages()[0].role, Role::System);
        assert!(managed.messages()[0].content.contains("facts from earlier"));
    }

    #[tokio::test]
    async fn rolling_over_threshold_compacts_and_returns_k_plus_one() {
        let provider = ScriptedProvider::summarizing("condensed digest");
        let summarizer = Summarizer::new(provider.clone());
        let mut session = session_with(7);

        let strategy = MemoryStrategy::RollingSummary {
            threshold: 4,
            keep_recent: 2,
        };
        let managed = strategy.select(&mut session, &summarizer).await;

        // Summary system message + keep_recent recents.
        assert_eq!(managed.len(), 3);
        assert_eq!(managed.messages()[0].role, Role::System);
        assert!(managed.messages()[0].content.contains("condensed digest"));
        assert_eq!(managed.messages()[1].content, "message 5");
        assert_eq!(managed.messages()[2].content, "message 6");

        // Stored state compacted in the same turn.
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.summary.as_deref(), Some("condensed digest"));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn rolling_folds_prior_summary_into_replacement() {
        let provider = ScriptedProvider::summarizing("second digest");
        let summarizer = Summarizer::new(provider);
        let mut session = session_with(6);
        session.summary = Some("first digest".to_string());

        let strategy = MemoryStrategy::RollingSummary {
            threshold: 4,
            keep_recent: 2,
        };
        strategy.select(&mut session, &summarizer).await;

        // The old summary is replaced, not appended to.
        assert_eq!(session.summary.as_deref(), Some("second digest"));
    }

    #[tokio::test]
    async fn rolling_degrades_to_window_when_summarizer_fails() {
        let provider = ScriptedProvider::failing();
        let summarizer = Summarizer::new(provider.clone());
        let mut session = session_with(7);
        session.summary = Some("previous digest".to_string());

        let strategy = MemoryStrategy::RollingSummary {
            threshold: 4,
            keep_recent: 2,
        };
        let managed = strategy.select(&mut session, &summarizer).await;

        // Bounded like SlidingWindow(keep_recent), nothing mutated.
        assert_eq!(managed.len(), 2);
        assert_eq!(managed.messages()[0].content, "message 5");
        assert_eq!(session.message_count(), 7);
        assert_eq!(session.summary.as_deref(), Some("previous digest"));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn rolling_with_keep_recent_zero_evicts_everything() {
        let provider = ScriptedProvider::summarizing("all of it");
        let summarizer = Summarizer::new(provider);
        let mut session = session_with(5);

        let strategy = MemoryStrategy::RollingSummary {
            threshold: 2,
            keep_recent: 0,
        };
        let managed = strategy.select(&mut session, &summarizer).await;

        assert_eq!(managed.len(), 1);
        assert_eq!(managed.messages()[0].role, Role::System);
        assert_eq!(session.message_count(), 0);
        assert_eq!(session.summary.as_deref(), Some("all of it"));
    }
}
