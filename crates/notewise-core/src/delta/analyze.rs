//! Flatten a delta into its plain-text projection.

use serde::Serialize;
use serde_json::Value;

use super::{AttributeSet, Delta, Op, EMBED_PLACEHOLDER};

/// Character range of the plain-text projection carrying formatting.
///
/// Offsets are half-open `[start, end)` and count chars, not bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatSpan {
    pub start: usize,
    pub end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttributeSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Value>,
}

impl FormatSpan {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_embed(&self) -> bool {
        self.embed.is_some()
    }
}

/// A line break found in the projection, with its block attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineBreakRecord {
    pub position: usize,
    pub attributes: AttributeSet,
}

/// Result of [`analyze`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeltaAnalysis {
    pub plain_text: String,
    pub format_spans: Vec<FormatSpan>,
    pub line_breaks: Vec<LineBreakRecord>,
}

impl DeltaAnalysis {
    /// Length of the projection in chars.
    pub fn char_len(&self) -> usize {
        self.plain_text.chars().count()
    }

    /// True when the projection has nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.plain_text.trim().is_empty()
    }
}

/// Walk the ops of `doc` and produce the plain text, format spans and
/// line-break records.
///
/// Only a text insert that is exactly `"\n"` (or a [`Op::LineBreak`]) yields
/// a [`LineBreakRecord`]. Newlines embedded in longer runs stay in the plain
/// text but are not recorded as line breaks.
///
/// An empty document yields an empty analysis; validating non-emptiness is
/// the caller's job.
pub fn analyze(doc: &Delta) -> DeltaAnalysis {
    let mut analysis = DeltaAnalysis::default();
    let mut cursor = 0usize;

    for op in &doc.ops {
        match op {
            Op::LineBreak { attributes } => {
                record_line_break(&mut analysis, cursor, attributes);
                cursor += 1;
            }
            Op::Text { text, attributes } if text == "\n" => {
                record_line_break(&mut analysis, cursor, attributes);
                cursor += 1;
            }
            Op::Text { text, attributes } => {
                let len = text.chars().count();
                analysis.plain_text.push_str(text);
                if let Some(attributes) = attributes {
                    if len > 0 {
                        analysis.format_spans.push(FormatSpan {
                            start: cursor,
                            end: cursor + len,
                            attributes: Some(attributes.clone()),
                            embed: None,
                        });
                    }
                }
                cursor += len;
            }
            Op::Embed {
                payload,
                attributes,
            } => {
                analysis.plain_text.push(EMBED_PLACEHOLDER);
                analysis.format_spans.push(FormatSpan {
                    start: cursor,
                    end: cursor + 1,
                    attributes: attributes.clone(),
                    embed: Some(payload.clone()),
                });
                cursor += 1;
            }
        }
    }

    analysis
}

fn record_line_break(
    analysis: &mut DeltaAnalysis,
    position: usize,
    attributes: &Option<AttributeSet>,
) {
    analysis.plain_text.push('\n');
    analysis.line_breaks.push(LineBreakRecord {
        position,
        attributes: attributes.clone().unwrap_or_default(),
    });
}

/// Plain-text projection only: text inserts verbatim, embeds as a space.
pub fn extract_text(doc: &Delta) -> String {
    analyze(doc).plain_text
}
