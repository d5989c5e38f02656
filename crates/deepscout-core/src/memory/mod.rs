//! Session memory: bounded working memory for the current run and a
//! short-term window over recent sessions.

mod manager;
mod short_term;
mod working;

pub use manager::MemoryManager;
pub use short_term::{SessionSummary, ShortTermMemory};
pub use working::{MemoryItem, MemoryKind, WorkingMemory};

/// Truncate to at most `max_chars` characters, respecting char boundaries.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_chars;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
