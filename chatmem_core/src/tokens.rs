//! Rough token estimation for logging and stats.
//!
//! The memory bound itself is a message count; this estimate exists so a
//! token-budget policy could be slotted in later without conflating the
//! two. No provider-tokenizer fidelity is promised.

/// Approximate token count assuming ~4 characters per token.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    if text.trim().is_empty() {
        return 0;
    }
    (text.len() / 4).max(1)
}

#[cfg(test)]
mod tests {
    use super::estimate_tokens;

    #[test]
    fn empty_and_whitespace_are_zero() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("   \n\t"), 0);
    }

    #[test]
    fn short_text_is_at_least_one() {
        assert_eq!(estimate_tokens("hi"), 1);
    }

    #[test]
    fn scales_with_length() {
        let text = "x".repeat(400);
        assert_eq!(estimate_tokens(&text), 100);
    }
}
