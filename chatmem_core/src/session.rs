//! Conversation state: messages and the per-session record.
//!
//! A session is addressed by an opaque caller-supplied id and owns its
//! ordered message history plus an optional rolling summary of evicted
//! older turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Uppercase label used when rendering a transcript.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Assistant => "ASSISTANT",
            Self::System => "SYSTEM",
        }
    }
}

/// One conversation turn. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Order marker. Insertion order in `Session::messages` stays
    /// authoritative for recency; the timestamp is informational.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A single ongoing conversation.
///
/// `summary`, when present, semantically subsumes all messages that are no
/// longer individually present. It is only ever replaced wholesale by a
/// summarization pass, never merged in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty session for the given id.
    ///
    /// A session with no stored messages is equivalent to a brand-new
    /// conversation, so this doubles as the fetch-miss result.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            messages: Vec::new(),
            summary: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message and touch the last-write marker.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
        self.updated_at = Utc::now();
    }

    /// The last `n` messages in original order.
    #[must_use]
    pub fn last_n(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Replace the summary and drop every message older than the last
    /// `keep_recent`. This is the compaction step of a summarization pass.
    pub fn compact(&mut self, summary: String, keep_recent: usize) {
        let cut = self.messages.len().saturating_sub(keep_recent);
        self.messages.drain(..cut);
        self.summary = Some(summary);
        self.updated_at = Utc::now();
    }

    #[must_use]
    pub const fn message_count(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Completed user/assistant exchanges so far.
    #[must_use]
    pub const fn turn_count(&self) -> usize {
        self.messages.len() / 2
    }

    /// Render the session as a plain-text transcript, summary first.
    ///
    /// Used for token estimation and debug output, not for the provider
    /// wire format.
    #[must_use]
    pub fn transcript(&self) -> String {
        let mut parts = Vec::new();
        if let Some(summary) = self.summary.as_deref() {
            let summary = summary.trim();
            if !summary.is_empty() {
                parts.push(format!("SUMMARY SO FAR:\n{summary}"));
            }
        }
        for m in &self.messages {
            parts.push(format!("{}: {}", m.role.label(), m.content));
        }
        parts.join("\n")
    }
}
