//! Memory manager coordinating working and short-term memory.

use super::{MemoryKind, ShortTermMemory, WorkingMemory};

/// Coordinates the current session's working memory with the short-term
/// window over past sessions.
#[derive(Debug, Clone)]
pub struct MemoryManager {
    pub working: WorkingMemory,
    pub short_term: ShortTermMemory,
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self {
            working: WorkingMemory::default(),
            short_term: ShortTermMemory::default(),
        }
    }
}

impl MemoryManager {
    pub fn new(working_size: usize, short_term_size: usize) -> Self {
        Self {
            working: WorkingMemory::new(working_size),
            short_term: ShortTermMemory::new(short_term_size),
        }
    }

    /// Add an item to working memory.
    pub fn remember(&mut self, kind: MemoryKind, content: impl Into<String>) {
        self.working.add(kind, content);
    }

    /// Save a completed session to short-term memory.
    pub fn save_session(
        &mut self,
        query: impl Into<String>,
        objective: impl Into<String>,
        report: &str,
    ) {
        self.short_term.save(query, objective, report);
    }

    /// Combined prompt context from both memory layers.
    pub fn context(&self) -> String {
        let mut parts = Vec::new();
        if !self.short_term.is_empty() {
            parts.push(format!("Recent Research:\n{}", self.short_term.summary()));
        }
        if !self.working.is_empty() {
            parts.push(format!("Current Session:\n{}", self.working.context_summary()));
        }
        parts.join("\n\n")
    }

    /// Clear working memory, typically at session end.
    pub fn clear_working(&mut self) {
        self.working.clear();
    }

    /// Reset both memory layers.
    pub fn reset(&mut self) {
        self.working.clear();
        self.short_term.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_empty_when_both_layers_empty() {
        let manager = MemoryManager::default();
        assert!(manager.context().is_empty());
    }

    #[test]
    fn context_combines_layers() {
        let mut manager = MemoryManager::new(5, 10);
        manager.save_session("old query", "obj", "report");
        manager.remember(MemoryKind::Query, "current query");

        let context = manager.context();
        assert!(context.contains("Recent Research:"));
        assert!(context.contains("old query"));
        assert!(context.contains("Current Session:"));
        assert!(context.contains("current query"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut manager = MemoryManager::new(5, 10);
        manager.save_session("q", "obj", "r");
        manager.remember(MemoryKind::Note, "n");

        manager.reset();
        assert!(manager.working.is_empty());
        assert!(manager.short_term.is_empty());
    }
}
