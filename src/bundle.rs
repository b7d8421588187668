//! The payload handed to the presentation layer for one completed search.

use serde::{Deserialize, Serialize};

use scout_search::ResultItem;

use crate::history::HistoryEntry;
use crate::query::Query;

/// Everything one search submission produced.
///
/// Immutable once built: fields are private and only readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    query: Query,
    items: Vec<ResultItem>,
    history_snapshot: Vec<HistoryEntry>,
    similar_terms: Vec<String>,
}

/// A result entry bound to its position in the bundle.
///
/// Positions are 1-based, matching the enumerated display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkBinding<'a> {
    pub index: usize,
    pub item: &'a ResultItem,
}

impl LinkBinding<'_> {
    /// The link to open, if this entry is navigable.
    pub fn link(&self) -> Option<&str> {
        self.item.is_navigable().then_some(self.item.link.as_str())
    }
}

impl ResultBundle {
    pub fn new(
        query: Query,
        items: Vec<ResultItem>,
        history_snapshot: Vec<HistoryEntry>,
        similar_terms: Vec<String>,
    ) -> Self {
        Self {
            query,
            items,
            history_snapshot,
            similar_terms,
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    pub fn history_snapshot(&self) -> &[HistoryEntry] {
        &self.history_snapshot
    }

    pub fn similar_terms(&self) -> &[String] {
        &self.similar_terms
    }

    /// Each item bound to its fixed 1-based index.
    pub fn bindings(&self) -> impl Iterator<Item = LinkBinding<'_>> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| LinkBinding { index: i + 1, item })
    }

    /// The navigable link of the item at 1-based `index`.
    ///
    /// `None` for out-of-range indices and for sentinel entries.
    pub fn link_at(&self, index: usize) -> Option<&str> {
        let item = self.items.get(index.checked_sub(1)?)?;
        item.is_navigable().then_some(item.link.as_str())
    }
}
