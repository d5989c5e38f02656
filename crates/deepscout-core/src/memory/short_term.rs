//! Short-term memory - a bounded window over recent completed sessions.

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::truncate_chars;

/// Default maximum number of sessions retained
pub const DEFAULT_MAX_SESSIONS: usize = 10;

/// Summary of one completed research session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub query: String,
    pub objective: String,
    /// Leading portion of the report, capped at 1000 chars.
    pub report_excerpt: String,
    pub timestamp: DateTime<Utc>,
}

/// Recent session summaries with oldest-first eviction and keyword lookup.
#[derive(Debug, Clone)]
pub struct ShortTermMemory {
    sessions: VecDeque<SessionSummary>,
    max_sessions: usize,
}

impl Default for ShortTermMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}

impl ShortTermMemory {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: VecDeque::with_capacity(max_sessions),
            max_sessions,
        }
    }

    /// Record a completed session.
    pub fn save(&mut self, query: impl Into<String>, objective: impl Into<String>, report: &str) {
        while self.sessions.len() >= self.max_sessions {
            self.sessions.pop_front();
        }
        self.sessions.push_back(SessionSummary {
            query: query.into(),
            objective: objective.into(),
            report_excerpt: truncate_chars(report, 1000).to_string(),
            timestamp: Utc::now(),
        });
    }

    /// The most recent `n` sessions, oldest first.
    pub fn recent(&self, n: usize) -> Vec<&SessionSummary> {
        let start = self.sessions.len().saturating_sub(n);
        self.sessions.iter().skip(start).collect()
    }

    /// Past sessions whose queries are most similar to `query`, best first.
    ///
    /// Similarity is Jaccard over lowercase word sets; sessions with no
    /// overlap are excluded.
    pub fn find_similar(&self, query: &str, top_k: usize) -> Vec<(&SessionSummary, f64)> {
        let query_words = word_set(query);

        let mut scored: Vec<(&SessionSummary, f64)> = self
            .sessions
            .iter()
            .filter_map(|session| {
                let score = jaccard(&query_words, &word_set(&session.query));
                (score > 0.0).then_some((session, score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);
        scored
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// One numbered line per session, queries truncated to 80 chars.
    pub fn summary(&self) -> String {
        if self.sessions.is_empty() {
            return "No sessions in short-term memory.".to_string();
        }

        let mut lines = vec![format!(
            "Short-term Memory ({} sessions):",
            self.sessions.len()
        )];
        for (i, session) in self.sessions.iter().enumerate() {
            lines.push(format!(
                "{}. {} ({})",
                i + 1,
                truncate_chars(&session.query, 80),
                session.timestamp.format("%Y-%m-%d %H:%M")
            ));
        }
        lines.join("\n")
    }
}

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_evicts_oldest() {
        let mut memory = ShortTermMemory::new(2);
        memory.save("first query", "obj", "report");
        memory.save("second query", "obj", "report");
        memory.save("third query", "obj", "report");

        assert_eq!(memory.len(), 2);
        assert_eq!(memory.recent(10)[0].query, "second query");
    }

    #[test]
    fn find_similar_ranks_by_overlap() {
        let mut memory = ShortTermMemory::new(10);
        memory.save("rust async runtime comparison", "obj", "r");
        memory.save("python packaging tools", "obj", "r");
        memory.save("rust web frameworks", "obj", "r");

        let similar = memory.find_similar("rust async frameworks", 2);
        assert_eq!(similar.len(), 2);
        assert!(similar[0].1 >= similar[1].1);
        assert!(similar[0].0.query.contains("rust"));
    }

    #[test]
    fn find_similar_skips_disjoint_queries() {
        let mut memory = ShortTermMemory::new(10);
        memory.save("quantum computing", "obj", "r");

        assert!(memory.find_similar("medieval history", 3).is_empty());
    }

    #[test]
    fn report_excerpt_is_capped() {
        let mut memory = ShortTermMemory::new(2);
        memory.save("q", "obj", &"r".repeat(5000));
        assert_eq!(memory.recent(1)[0].report_excerpt.len(), 1000);
    }

    #[test]
    fn summary_lists_sessions() {
        let mut memory = ShortTermMemory::new(5);
        memory.save("first", "obj", "r");
        memory.save("second", "obj", "r");

        let summary = memory.summary();
        assert!(summary.contains("2 sessions"));
        assert!(summary.contains("1. first"));
        assert!(summary.contains("2. second"));
    }
}
