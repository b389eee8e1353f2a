//! Conversation truncation by character budget
//!
//! Bounds the total size of the history forwarded upstream. The budget is
//! a coarse proxy for a model's context window, counted in characters
//! (Unicode scalar values), not tokens.

use super::Message;

/// Truncate a conversation to a character budget.
///
/// Walks the messages in original order, keeping a running total of content
/// lengths, and stops at the first message that would push the total over
/// `limit`. The result is always a contiguous prefix of the input, so the
/// conversation never loses its chronological shape; the trade-off is that
/// a single oversized early message drops everything after it, including
/// itself.
pub fn truncate(messages: Vec<Message>, limit: usize) -> Vec<Message> {
    let mut total = 0usize;
    let mut kept = Vec::with_capacity(messages.len());

    for message in messages {
        let length = message.content.chars().count();
        if total + length > limit {
            break;
        }
        total += length;
        kept.push(message);
    }

    kept
}
