//! Plain text ⇄ delta wrappers.

use super::{Delta, Op, LINK_ATTRIBUTE};
use crate::links::{extract_links, extract_links_from_delta, LINK_PATTERN};
use crate::models::TextConversion;

/// Wrap `text` in a single-run delta. Empty text yields one empty run.
pub fn plain_to_doc(text: &str) -> Delta {
    Delta::from_ops(vec![Op::text(text)])
}

/// Like [`plain_to_doc`], but every URL becomes its own run with a `link`
/// attribute equal to the matched text.
pub fn plain_to_doc_with_links(text: &str) -> Delta {
    let mut ops = Vec::new();
    let mut last = 0;

    for found in LINK_PATTERN.find_iter(text) {
        if found.start() > last {
            ops.push(Op::text(&text[last..found.start()]));
        }
        let mut attributes = super::AttributeSet::new();
        attributes.insert(
            LINK_ATTRIBUTE.to_string(),
            serde_json::Value::String(found.as_str().to_string()),
        );
        ops.push(Op::text_with(found.as_str(), attributes));
        last = found.end();
    }

    if last < text.len() {
        ops.push(Op::text(&text[last..]));
    }
    if ops.is_empty() {
        ops.push(Op::text(""));
    }

    Delta::from_ops(ops)
}

/// Concatenate the text of every run. A run with a `link` attribute
/// contributes the link target instead of its visible text. Embeds
/// contribute nothing.
pub fn doc_to_plain(doc: &Delta) -> String {
    let mut plain = String::new();
    for op in &doc.ops {
        match op {
            Op::Text { text, attributes } => {
                let link = attributes
                    .as_ref()
                    .and_then(|attributes| attributes.get(LINK_ATTRIBUTE))
                    .and_then(|value| value.as_str());
                plain.push_str(link.unwrap_or(text));
            }
            Op::LineBreak { .. } => plain.push('\n'),
            Op::Embed { .. } => {}
        }
    }
    plain
}

/// Fill in the missing side of a message's text/delta pair and collect its
/// links. A delta takes precedence over text when both are given.
pub fn text_conversions(text_content: Option<&str>, delta_content: Option<&Delta>) -> TextConversion {
    if let Some(doc) = delta_content {
        return TextConversion {
            text_content: Some(doc_to_plain(doc)),
            delta_content: Some(doc.clone()),
            links: extract_links_from_delta(doc),
        };
    }

    match text_content.filter(|text| !text.is_empty()) {
        Some(text) => TextConversion {
            text_content: Some(text.to_string()),
            delta_content: Some(plain_to_doc_with_links(text)),
            links: extract_links(text),
        },
        None => TextConversion {
            text_content: text_content.map(str::to_string),
            delta_content: None,
            links: Vec::new(),
        },
    }
}
