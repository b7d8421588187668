//! Core types: extracted result entries and the selector rule that finds them.

use serde::{Deserialize, Serialize};

/// Title of the placeholder entry returned when a page carries no results.
pub const NO_RESULTS_TITLE: &str = "No results found";

/// Title of the placeholder entry returned when the provider fetch failed.
pub const SEARCH_ERROR_TITLE: &str = "Error performing search";

/// What a [`ResultItem`] stands for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// An extracted result.
    #[default]
    Hit,
    /// Placeholder for a page without results.
    NoResults,
    /// Placeholder for a failed fetch.
    Error,
}

impl ItemKind {
    pub fn is_hit(&self) -> bool {
        *self == Self::Hit
    }
}

/// One search hit, or a sentinel standing in for "no results" / "error".
///
/// Only hits with a non-empty `link` are navigable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Visible anchor text, trimmed.
    pub title: String,
    /// The anchor's `href`, or the error description for the error sentinel.
    pub link: String,
    /// Omitted on the wire for hits.
    #[serde(default, skip_serializing_if = "ItemKind::is_hit")]
    pub kind: ItemKind,
}

impl ResultItem {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            kind: ItemKind::Hit,
        }
    }

    /// The "no results" sentinel.
    pub fn no_results() -> Self {
        Self {
            kind: ItemKind::NoResults,
            ..Self::new(NO_RESULTS_TITLE, "")
        }
    }

    /// The transport-failure sentinel, carrying the failure description as its link.
    pub fn search_error(description: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::Error,
            ..Self::new(SEARCH_ERROR_TITLE, description)
        }
    }

    /// Whether this entry can be opened in a content viewer.
    pub fn is_navigable(&self) -> bool {
        self.kind.is_hit() && !self.link.is_empty()
    }
}

/// Which elements of a provider page count as results.
///
/// Matches elements named `tag` whose `attribute` contains `value` as one of
/// its whitespace-separated tokens (the way `class` lists work).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorRule {
    pub tag: String,
    pub attribute: String,
    pub value: String,
}

impl SelectorRule {
    pub fn new(
        tag: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Render the rule as a CSS selector (`tag[attribute~="value"]`).
    pub fn to_css(&self) -> String {
        let escaped = self.value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("{}[{}~=\"{}\"]", self.tag, self.attribute, escaped)
    }
}

impl Default for SelectorRule {
    /// DuckDuckGo's HTML endpoint marks organic result titles with `a.result__a`.
    fn default() -> Self {
        Self::new("a", "class", "result__a")
    }
}
