//! List detection and the list-preserving rebuild.
//!
//! Rewrites of checklists and bullet lists often merge, split or add items,
//! so the offset-based [`reconstruct`](super::reconstruct) would leave new
//! items untagged. This path works per line instead:
//!
//! - when the rewrite kept the line count, every line takes back the
//!   terminator attributes of the original line at the same index;
//! - when the count changed, every non-empty line and the final line are
//!   tagged from the original list attributes, wrapping around the list.
//!
//! Inline formatting is only restored for whole lines that still contain an
//! attributed run of the original verbatim. Embeds are not carried over.

use std::collections::BTreeMap;

use super::{
    analyze::extract_text, split_lines, AttributeSet, Delta, ListKind, Op, LIST_ATTRIBUTE,
};

/// Whether any line terminator of `doc` carries a recognized list kind.
///
/// Terminators are line break ops and newlines inside longer text runs.
pub fn is_list_like(doc: &Delta) -> bool {
    doc.ops.iter().any(|op| match op {
        Op::LineBreak { .. } => op.list_kind().is_some(),
        Op::Text { text, .. } => text.contains('\n') && op.list_kind().is_some(),
        Op::Embed { .. } => false,
    })
}

/// Most frequent list kind across `list_attributes`.
///
/// Ties go to the kind that sorts first in [`ListKind`]: checked, then
/// unchecked, bullet, ordered.
pub fn default_list_attribute(list_attributes: &[AttributeSet]) -> Option<ListKind> {
    let mut counts: BTreeMap<ListKind, usize> = BTreeMap::new();
    for attributes in list_attributes {
        if let Some(kind) = ListKind::from_attributes(attributes) {
            *counts.entry(kind).or_default() += 1;
        }
    }

    let mut best: Option<(ListKind, usize)> = None;
    for (kind, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((kind, count));
        }
    }
    best.map(|(kind, _)| kind)
}

/// Rebuild a list-like document from its rewritten plain text.
pub fn preserve_list_formatting(original: &Delta, enhanced_text: &str) -> Delta {
    let terminators = line_terminators(original);
    let list_attributes: Vec<AttributeSet> = terminators
        .iter()
        .filter(|attributes| ListKind::from_attributes(attributes).is_some())
        .cloned()
        .collect();
    let default_kind = default_list_attribute(&list_attributes);
    let inline_runs = inline_formatted_runs(original);

    let original_text = extract_text(original);
    let (original_lines, original_ends_with_newline) = split_lines(&original_text);

    let (mut lines, ends_with_newline) = split_lines(enhanced_text);
    let first_is_blank = lines.first().is_some_and(|line| line.trim().is_empty());
    let original_first_is_blank = original_lines
        .first()
        .map_or(true, |line| line.trim().is_empty());
    if lines.len() > 1 && first_is_blank && !original_first_is_blank {
        lines.remove(0);
    }

    let positional = lines.len() == original_lines.len();
    let terminate_last = ends_with_newline || original_ends_with_newline;
    let last_index = lines.len() - 1;

    let mut delta = Delta::new();
    for (index, line) in lines.iter().enumerate() {
        let run_attributes = inline_runs
            .iter()
            .find(|(text, _)| line.contains(text.as_str()))
            .map(|(_, attributes)| attributes.clone());
        delta.push_text(line, run_attributes);

        let is_last = index == last_index;
        if is_last && !terminate_last {
            continue;
        }

        let break_attributes = if positional {
            terminators
                .get(index)
                .filter(|attributes| !attributes.is_empty())
                .cloned()
        } else if !line.trim().is_empty() || is_last {
            if list_attributes.is_empty() {
                default_kind.map(ListKind::to_attributes)
            } else {
                Some(list_attributes[index % list_attributes.len()].clone())
            }
        } else {
            None
        };
        delta.push_line_break(break_attributes);
    }

    if let Some(kind) = default_kind {
        force_default_if_untagged(&mut delta, kind);
    }

    delta
}

/// Attributes of every line terminator in `doc`, in order. Unattributed
/// terminators yield an empty set.
fn line_terminators(doc: &Delta) -> Vec<AttributeSet> {
    let mut terminators = Vec::new();
    for op in &doc.ops {
        match op {
            Op::LineBreak { attributes } => {
                terminators.push(attributes.clone().unwrap_or_default());
            }
            Op::Text { text, attributes } => {
                for _ in text.matches('\n') {
                    terminators.push(attributes.clone().unwrap_or_default());
                }
            }
            Op::Embed { .. } => {}
        }
    }
    terminators
}

/// Text runs carrying non-list attributes, as `(trimmed text, attributes)`.
fn inline_formatted_runs(doc: &Delta) -> Vec<(String, AttributeSet)> {
    doc.ops
        .iter()
        .filter_map(|op| match op {
            Op::Text {
                text,
                attributes: Some(attributes),
            } if text != "\n" => {
                let mut attributes = attributes.clone();
                attributes.remove(LIST_ATTRIBUTE);
                let trimmed = text.trim();
                if attributes.is_empty() || trimmed.is_empty() {
                    None
                } else {
                    Some((trimmed.to_string(), attributes))
                }
            }
            _ => None,
        })
        .collect()
}

/// Tag every line break with `kind` when none of them carries a list kind.
fn force_default_if_untagged(delta: &mut Delta, kind: ListKind) {
    let any_tagged = delta
        .ops
        .iter()
        .any(|op| op.is_line_break() && op.list_kind().is_some());
    if any_tagged {
        return;
    }

    for op in delta.ops.iter_mut() {
        if let Op::LineBreak { attributes } = op {
            attributes
                .get_or_insert_with(AttributeSet::new)
                .extend(kind.to_attributes());
        }
    }
}
