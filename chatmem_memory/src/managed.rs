//! The managed history actually sent to the model for one turn.

use chatmem_core::{Message, estimate_tokens};

/// Messages selected (and possibly compressed) for a single model call.
///
/// When a summary participates it is carried as a leading synthetic system
/// message, so providers need no special casing.
#[derive(Debug, Clone)]
pub struct ManagedHistory {
    messages: Vec<Message>,
}

impl ManagedHistory {
    #[must_use]
    pub const fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Rough size of what will go over the wire, for logging only.
    #[must_use]
    pub fn estimated_tokens(&self) -> usize {
        self.messages
            .iter()
            .map(|m| estimate_tokens(&m.content))
            .sum()
    }

    #[must_use]
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
