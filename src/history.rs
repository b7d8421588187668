//! Query history: occurrence counts in first-seen order, plus fuzzy lookup.
//!
//! One [`HistoryStore`] is owned by the orchestrator and shared with its
//! worker tasks through an `Arc`. Mutations serialise on a write lock;
//! readers copy what they need under the read lock and do any expensive
//! work (similarity scoring) after releasing it, so a reader always sees a
//! count either before or after an increment, never in between.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::query::Query;
use crate::similarity;

/// Default similarity cutoff for [`HistoryStore::fuzzy_match`].
pub const DEFAULT_CUTOFF: f64 = 0.6;

/// One history row: a past query and how often it was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub term: String,
    pub count: u64,
}

#[derive(Debug, Default)]
struct Entries {
    /// First-seen order.
    rows: Vec<HistoryEntry>,
    /// term -> position in `rows`.
    index: HashMap<String, usize>,
}

/// Frequency map of past queries with approximate-match lookup.
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: RwLock<Entries>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more submission of `query`, inserting it with count 1 if new.
    ///
    /// Returns the updated count.
    pub fn record(&self, query: &Query) -> u64 {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let term = query.as_str();

        if let Some(&pos) = entries.index.get(term) {
            let row = &mut entries.rows[pos];
            row.count += 1;
            return row.count;
        }

        let pos = entries.rows.len();
        entries.rows.push(HistoryEntry {
            term: term.to_owned(),
            count: 1,
        });
        entries.index.insert(term.to_owned(), pos);
        1
    }

    /// How often `term` has been recorded, if at all.
    pub fn count(&self, term: &str) -> Option<u64> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.index.get(term).map(|&pos| entries.rows[pos].count)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .rows
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A point-in-time copy of every entry, in first-seen order.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .rows
            .clone()
    }

    /// Recorded terms whose similarity to `term` is at least `cutoff`.
    ///
    /// Ordered by descending similarity; equal scores keep first-seen
    /// order. A term identical to `term` scores 1.0 and is included.
    /// `cutoff` is expected in `[0, 1]`.
    pub fn fuzzy_match(&self, term: &str, cutoff: f64) -> Vec<String> {
        let candidates: Vec<String> = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            entries.rows.iter().map(|row| row.term.clone()).collect()
        };

        let mut scored: Vec<(f64, String)> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let score = similarity::score(term, &candidate);
                (score >= cutoff).then_some((score, candidate))
            })
            .collect();

        // Stable sort keeps first-seen order among equal scores.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        tracing::debug!(candidates = scored.len(), cutoff, "history fuzzy match");
        scored.into_iter().map(|(_, term)| term).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn q(raw: &str) -> Query {
        Query::parse(raw).expect("non-empty query")
    }

    #[test]
    fn record_inserts_then_increments() {
        let store = HistoryStore::new();
        assert_eq!(store.record(&q("rust")), 1);
        assert_eq!(store.record(&q("rust")), 2);
        assert_eq!(store.count("rust"), Some(2));
        assert_eq!(store.count("go"), None);
    }

    #[test]
    fn record_n_times_gives_count_n() {
        let store = HistoryStore::new();
        for _ in 0..7 {
            store.record(&q("zig"));
        }
        assert_eq!(store.count("zig"), Some(7));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn snapshot_keeps_first_seen_order() {
        let store = HistoryStore::new();
        store.record(&q("rust lang"));
        store.record(&q("rust lang"));
        store.record(&q("rust land"));
        store.record(&q("rust lang"));

        assert_eq!(
            store.snapshot(),
            vec![
                HistoryEntry {
                    term: "rust lang".into(),
                    count: 3
                },
                HistoryEntry {
                    term: "rust land".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn snapshot_is_detached() {
        let store = HistoryStore::new();
        store.record(&q("a"));
        let snap = store.snapshot();
        store.record(&q("a"));
        store.record(&q("b"));
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].count, 1);
    }

    #[test]
    fn empty_store() {
        let store = HistoryStore::new();
        assert!(store.is_empty());
        assert!(store.snapshot().is_empty());
        assert!(store.fuzzy_match("anything", DEFAULT_CUTOFF).is_empty());
    }

    #[test]
    fn fuzzy_match_prefix_query() {
        let store = HistoryStore::new();
        store.record(&q("python tutorial"));
        for _ in 0..3 {
            store.record(&q("java"));
        }
        assert_eq!(
            store.fuzzy_match("python", DEFAULT_CUTOFF),
            vec!["python tutorial".to_string()]
        );
    }

    #[test]
    fn short_query_does_not_match_unrelated_history() {
        let store = HistoryStore::new();
        for term in ["java", "rust lang", "weather today", "how to bake bread", "zig"] {
            store.record(&q(term));
        }

        assert!(store.fuzzy_match("a", DEFAULT_CUTOFF).is_empty());
        assert!(store.fuzzy_match("to", DEFAULT_CUTOFF).is_empty());
        assert_eq!(
            store.fuzzy_match("rust", DEFAULT_CUTOFF),
            vec!["rust lang".to_string()]
        );
    }

    #[test]
    fn fuzzy_match_includes_self_first() {
        let store = HistoryStore::new();
        store.record(&q("weather today"));
        store.record(&q("rust land"));
        store.record(&q("rust lang"));

        let matches = store.fuzzy_match("rust lang", DEFAULT_CUTOFF);
        assert_eq!(matches, vec!["rust lang".to_string(), "rust land".to_string()]);
    }

    #[test]
    fn fuzzy_match_ties_keep_insertion_order() {
        let store = HistoryStore::new();
        store.record(&q("rust lanx"));
        store.record(&q("rust lany"));
        store.record(&q("rust lanz"));

        assert_eq!(
            store.fuzzy_match("rust lang", DEFAULT_CUTOFF),
            vec![
                "rust lanx".to_string(),
                "rust lany".to_string(),
                "rust lanz".to_string()
            ]
        );
    }

    #[test]
    fn cutoff_bounds() {
        let store = HistoryStore::new();
        store.record(&q("alpha"));
        store.record(&q("omega"));

        assert_eq!(store.fuzzy_match("alpha", 1.0), vec!["alpha".to_string()]);
        assert_eq!(store.fuzzy_match("alpha", 0.0).len(), 2);
    }

    #[test]
    fn concurrent_distinct_records() {
        let store = Arc::new(HistoryStore::new());
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.record(&q(&format!("query {i}")));
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("recorder thread");
        }

        let snap = store.snapshot();
        assert_eq!(snap.len(), 32);
        assert!(snap.iter().all(|entry| entry.count == 1));
    }

    #[test]
    fn concurrent_same_key_records_are_not_lost() {
        let store = Arc::new(HistoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.record(&q("hot"));
                        let _ = store.fuzzy_match("hot", DEFAULT_CUTOFF);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("recorder thread");
        }
        assert_eq!(store.count("hot"), Some(800));
    }
}
