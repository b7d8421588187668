//! HTML result extraction.
//!
//! Turns a provider results page into an ordered list of [`ResultItem`]s
//! using an explicit [`SelectorRule`]. Extraction is best-effort: broken
//! markup is parsed as far as html5ever can, and a page with no matching
//! elements yields the single "no results" sentinel.

use scraper::{Html, Selector};

use crate::error::SearchError;
use crate::types::{ResultItem, SelectorRule};

/// Compiled result extractor.
#[derive(Debug, Clone)]
pub struct Extractor {
    selector: Selector,
    max_results: Option<usize>,
}

impl Extractor {
    /// Compile `rule` into an extractor.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Parse`] if the rule does not form a valid selector.
    pub fn new(rule: &SelectorRule) -> Result<Self, SearchError> {
        let css = rule.to_css();
        let selector = Selector::parse(&css)
            .map_err(|e| SearchError::Parse(format!("invalid result selector {css}: {e:?}")))?;
        Ok(Self {
            selector,
            max_results: None,
        })
    }

    /// Keep at most `max_results` real matches.
    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    /// Extract every matching element of `document`, in document order.
    ///
    /// Never returns an empty vector: zero matches become
    /// [`ResultItem::no_results`].
    pub fn extract(&self, document: &str) -> Vec<ResultItem> {
        let html = Html::parse_document(document);
        let limit = self.max_results.unwrap_or(usize::MAX);

        let mut items: Vec<ResultItem> = html
            .select(&self.selector)
            .take(limit)
            .map(|element| {
                let title = element.text().collect::<String>().trim().to_owned();
                let link = element.value().attr("href").unwrap_or_default().to_owned();
                ResultItem::new(title, link)
            })
            .collect();

        tracing::debug!(count = items.len(), "results extracted");

        if items.is_empty() {
            items.push(ResultItem::no_results());
        }
        items
    }
}
