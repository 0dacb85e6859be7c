//! URL extraction from message text and deltas.
//!
//! The pattern is deliberately loose: an optional scheme, an optional `www.`,
//! one or more dotted labels ending in a 2+ letter TLD, and an optional path.
//! Matches are returned as found, with no case or punctuation normalization.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::delta::{Delta, Op, LINK_ATTRIBUTE};

/// Conservative URL pattern shared by extraction and link-aware conversion.
pub(crate) static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:https?://)?(?:www\.)?(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}(?:/[^\s]*)?")
        .expect("link pattern is valid")
});

/// Every URL-like substring of `text`, in order, duplicates kept.
///
/// # Examples
///
/// ```
/// use notewise_core::extract_links;
///
/// let links = extract_links("Check out example.com and visit https://test.com/a?b=1");
/// assert_eq!(links, vec!["example.com", "https://test.com/a?b=1"]);
/// ```
pub fn extract_links(text: &str) -> Vec<String> {
    LINK_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Links referenced by a delta: `link` attribute values plus URLs found in
/// text inserts, de-duplicated in first-seen order.
pub fn extract_links_from_delta(doc: &Delta) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    let mut push_unique = |link: &str| {
        if !links.iter().any(|existing| existing == link) {
            links.push(link.to_string());
        }
    };

    for op in &doc.ops {
        if let Some(link) = op
            .attributes()
            .and_then(|attributes| attributes.get(LINK_ATTRIBUTE))
            .and_then(|value| value.as_str())
        {
            push_unique(link);
        }

        if let Op::Text { text, .. } = op {
            for found in LINK_PATTERN.find_iter(text) {
                push_unique(found.as_str());
            }
        }
    }

    links
}
