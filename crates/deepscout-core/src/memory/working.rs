//! Working memory - a bounded buffer of items from the current session.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::truncate_chars;

/// Default maximum number of items held in working memory
pub const DEFAULT_MAX_ITEMS: usize = 5;

/// What kind of information a memory item carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
    Query,
    Plan,
    Findings,
    Report,
    Note,
}

impl MemoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryKind::Query => "query",
            MemoryKind::Plan => "plan",
            MemoryKind::Findings => "findings",
            MemoryKind::Report => "report",
            MemoryKind::Note => "note",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryItem {
    pub kind: MemoryKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Bounded working memory with oldest-first eviction.
#[derive(Debug, Clone)]
pub struct WorkingMemory {
    items: VecDeque<MemoryItem>,
    max_items: usize,
}

impl Default for WorkingMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEMS)
    }
}

impl WorkingMemory {
    pub fn new(max_items: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(max_items),
            max_items,
        }
    }

    /// Add an item, evicting the oldest when at capacity.
    pub fn add(&mut self, kind: MemoryKind, content: impl Into<String>) {
        while self.items.len() >= self.max_items {
            self.items.pop_front();
        }
        self.items.push_back(MemoryItem {
            kind,
            content: content.into(),
            timestamp: Utc::now(),
        });
    }

    /// The most recent `n` items, oldest first.
    pub fn recent(&self, n: usize) -> Vec<&MemoryItem> {
        let start = self.items.len().saturating_sub(n);
        self.items.iter().skip(start).collect()
    }

    /// All items of the given kind, oldest first.
    pub fn by_kind(&self, kind: MemoryKind) -> Vec<&MemoryItem> {
        self.items.iter().filter(|i| i.kind == kind).collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// One line per item, content truncated to 100 chars.
    pub fn context_summary(&self) -> String {
        if self.items.is_empty() {
            return "No items in working memory.".to_string();
        }

        let mut lines = vec!["Working Memory Context:".to_string()];
        for item in &self.items {
            lines.push(format!(
                "- [{}] {}",
                item.kind.as_str(),
                truncate_chars(&item.content, 100)
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eviction_is_oldest_first() {
        let mut memory = WorkingMemory::new(2);
        memory.add(MemoryKind::Query, "first");
        memory.add(MemoryKind::Plan, "second");
        memory.add(MemoryKind::Findings, "third");

        assert_eq!(memory.len(), 2);
        let recent = memory.recent(10);
        assert_eq!(recent[0].content, "second");
        assert_eq!(recent[1].content, "third");
    }

    #[test]
    fn by_kind_filters() {
        let mut memory = WorkingMemory::new(10);
        memory.add(MemoryKind::Query, "q");
        memory.add(MemoryKind::Plan, "p");
        memory.add(MemoryKind::Query, "q2");

        let queries = memory.by_kind(MemoryKind::Query);
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1].content, "q2");
    }

    #[test]
    fn context_summary_truncates_content() {
        let mut memory = WorkingMemory::new(5);
        memory.add(MemoryKind::Findings, "x".repeat(300));

        let summary = memory.context_summary();
        assert!(summary.starts_with("Working Memory Context:"));
        assert!(summary.contains(&"x".repeat(100)));
        assert!(!summary.contains(&"x".repeat(101)));
    }

    #[test]
    fn empty_summary_message() {
        let memory = WorkingMemory::default();
        assert_eq!(memory.context_summary(), "No items in working memory.");
    }
}
