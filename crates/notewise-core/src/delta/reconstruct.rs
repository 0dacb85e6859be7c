//! Rebuild a delta from rewritten plain text and the original formatting.
//!
//! This is a best-effort remap. Each rewritten line is located by offset
//! and the original format spans overlapping that range are re-applied to
//! the characters found there. Inline formatting survives exactly when the
//! rewrite kept line boundaries and character offsets (capitalisation,
//! spelling fixes of equal length); otherwise spans land on shifted text.

use super::analyze::{DeltaAnalysis, FormatSpan, LineBreakRecord};
use super::{slice_chars, split_lines, Delta, Op};

/// Re-apply `format_spans` and `line_breaks` from the original analysis to
/// `enhanced_text`.
///
/// Every line but the last is followed by a line break; the last line gets
/// one only when `enhanced_text` ends with a newline. Line break `i` takes
/// the attributes of original record `i` when that record exists and is
/// non-empty.
pub fn reconstruct(
    enhanced_text: &str,
    format_spans: &[FormatSpan],
    line_breaks: &[LineBreakRecord],
) -> Delta {
    rebuild(enhanced_text, format_spans, line_breaks, false)
}

/// Like [`reconstruct`], but also terminates the last line when the
/// analyzed original text ended with a newline, so a rewrite that drops the
/// trailing newline does not change the document's shape.
pub fn reconstruct_with_analysis(enhanced_text: &str, analysis: &DeltaAnalysis) -> Delta {
    rebuild(
        enhanced_text,
        &analysis.format_spans,
        &analysis.line_breaks,
        analysis.plain_text.ends_with('\n'),
    )
}

fn rebuild(
    enhanced_text: &str,
    format_spans: &[FormatSpan],
    line_breaks: &[LineBreakRecord],
    original_ends_with_newline: bool,
) -> Delta {
    let (lines, ends_with_newline) = split_lines(enhanced_text);
    let terminate_last = ends_with_newline || original_ends_with_newline;

    let mut spans: Vec<&FormatSpan> = format_spans.iter().collect();
    spans.sort_by_key(|span| span.start);

    let mut delta = Delta::new();
    let mut line_start = 0usize;
    let last_index = lines.len() - 1;

    for (index, line) in lines.iter().enumerate() {
        let chars: Vec<char> = line.chars().collect();
        let line_end = line_start + chars.len();

        emit_line(&mut delta, &chars, line_start, line_end, &spans);

        if index < last_index || terminate_last {
            let attributes = line_breaks
                .get(index)
                .filter(|record| !record.attributes.is_empty())
                .map(|record| record.attributes.clone());
            delta.push_line_break(attributes);
        }

        line_start = line_end + 1;
    }

    delta
}

/// Emit one line's text, splitting it at the boundaries of overlapping spans.
fn emit_line(
    delta: &mut Delta,
    chars: &[char],
    line_start: usize,
    line_end: usize,
    spans: &[&FormatSpan],
) {
    let mut cursor = line_start;

    for span in spans
        .iter()
        .filter(|span| span.start < line_end && span.end > line_start)
    {
        let start = span.start.max(line_start);
        let end = span.end.min(line_end);

        if start > cursor {
            let plain = slice_chars(chars, cursor - line_start, start - line_start);
            delta.push_text(&plain, None);
        }

        if let Some(payload) = &span.embed {
            delta.push(Op::embed(payload.clone(), span.attributes.clone()));
        } else if end > cursor.max(start) {
            let from = cursor.max(start);
            let formatted = slice_chars(chars, from - line_start, end - line_start);
            delta.push_text(&formatted, span.attributes.clone());
        }

        cursor = cursor.max(end);
    }

    if cursor < line_end {
        let rest = slice_chars(chars, cursor - line_start, line_end - line_start);
        delta.push_text(&rest, None);
    }
}
