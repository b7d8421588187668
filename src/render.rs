//! Plain-text rendering of a result bundle.
//!
//! Produces the listing a simple text panel shows: numbered results with
//! their links, the history with counts, and suggestions when there are any.

use crate::bundle::ResultBundle;

/// Render `bundle` as a text listing.
pub fn render_text(bundle: &ResultBundle) -> String {
    let mut out = format!("Results for '{}':\n\n", bundle.query());
    for binding in bundle.bindings() {
        out.push_str(&format!(
            "{}. {}\n{}\n\n",
            binding.index, binding.item.title, binding.item.link
        ));
    }

    out.push_str("\nSearch History:\n");
    for entry in bundle.history_snapshot() {
        out.push_str(&format!("{}: {}\n", entry.term, entry.count));
    }

    if !bundle.similar_terms().is_empty() {
        out.push_str("\nSimilar Search Terms:\n");
        for term in bundle.similar_terms() {
            out.push_str(term);
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryEntry;
    use crate::query::Query;
    use scout_search::ResultItem;

    #[test]
    fn renders_all_sections() {
        let bundle = ResultBundle::new(
            Query::parse("rust lang").expect("non-empty"),
            vec![
                ResultItem::new("Rust", "https://www.rust-lang.org/"),
                ResultItem::new("Book", "https://doc.rust-lang.org/book/"),
            ],
            vec![
                HistoryEntry {
                    term: "rust lang".into(),
                    count: 2,
                },
                HistoryEntry {
                    term: "rust land".into(),
                    count: 1,
                },
            ],
            vec!["rust lang".into(), "rust land".into()],
        );

        let expected = "Results for 'rust lang':\n\n\
                        1. Rust\nhttps://www.rust-lang.org/\n\n\
                        2. Book\nhttps://doc.rust-lang.org/book/\n\n\
                        \nSearch History:\n\
                        rust lang: 2\n\
                        rust land: 1\n\
                        \nSimilar Search Terms:\n\
                        rust lang\n\
                        rust land\n";
        assert_eq!(render_text(&bundle), expected);
    }

    #[test]
    fn suggestions_section_omitted_when_empty() {
        let bundle = ResultBundle::new(
            Query::parse("xyz").expect("non-empty"),
            vec![ResultItem::search_error("request failed: offline")],
            vec![HistoryEntry {
                term: "xyz".into(),
                count: 1,
            }],
            Vec::new(),
        );
        let text = render_text(&bundle);
        assert!(text.contains("1. Error performing search\nrequest failed: offline\n"));
        assert!(text.ends_with("Search History:\nxyz: 1\n"));
        assert!(!text.contains("Similar Search Terms"));
    }
}
