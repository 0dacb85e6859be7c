//! Rich-text document model ("Delta") and the engine that maps it to and
//! from plain text.
//!
//! A [`Delta`] is an ordered list of [`Op`]s. Each op inserts either a run of
//! text, a single line break, or an embed (image, video, ...). Block-level
//! formatting such as list markers lives on the line break that terminates a
//! line, never on the text before it.
//!
//! Submodules:
//! - [`analyze`]: flatten a delta into plain text, format spans and line breaks
//! - [`reconstruct`]: rebuild a delta from rewritten plain text
//! - [`list`]: list detection and the list-preserving rebuild
//! - [`convert`]: plain text ⇄ delta wrappers and message text conversions

pub mod analyze;
pub mod convert;
pub mod list;
pub mod reconstruct;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

pub use analyze::{analyze, extract_text, DeltaAnalysis, FormatSpan, LineBreakRecord};
pub use convert::{doc_to_plain, plain_to_doc, plain_to_doc_with_links, text_conversions};
pub use list::{default_list_attribute, is_list_like, preserve_list_formatting};
pub use reconstruct::{reconstruct, reconstruct_with_analysis};

/// Attribute name → value map carried by an op (e.g. `bold: true`).
pub type AttributeSet = serde_json::Map<String, Value>;

/// Attribute key for block-level list formatting.
pub const LIST_ATTRIBUTE: &str = "list";

/// Attribute key for hyperlinks.
pub const LINK_ATTRIBUTE: &str = "link";

/// Character an embed occupies in the plain-text projection.
pub const EMBED_PLACEHOLDER: char = ' ';

// =============================================================================
// LIST KINDS
// =============================================================================

/// Recognized values of the `list` line attribute.
///
/// Variant order is the tie-break priority used when picking a default list
/// kind: the checkbox group wins over bullet/ordered, alphabetical inside
/// each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Checked,
    Unchecked,
    Bullet,
    Ordered,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Checked => "checked",
            ListKind::Unchecked => "unchecked",
            ListKind::Bullet => "bullet",
            ListKind::Ordered => "ordered",
        }
    }

    /// Read the list kind from an attribute set, ignoring unknown values.
    pub fn from_attributes(attributes: &AttributeSet) -> Option<Self> {
        attributes
            .get(LIST_ATTRIBUTE)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// A fresh attribute set carrying only this list kind.
    pub fn to_attributes(self) -> AttributeSet {
        let mut attributes = AttributeSet::new();
        attributes.insert(
            LIST_ATTRIBUTE.to_string(),
            Value::String(self.as_str().to_string()),
        );
        attributes
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "checked" => Ok(ListKind::Checked),
            "unchecked" => Ok(ListKind::Unchecked),
            "bullet" => Ok(ListKind::Bullet),
            "ordered" => Ok(ListKind::Ordered),
            other => Err(Error::InvalidInput(format!("Unknown list kind: {}", other))),
        }
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// One element of a [`Delta`].
///
/// Serializes as `{"insert": ..., "attributes": {...}}`. An insert of exactly
/// `"\n"` is a [`Op::LineBreak`], any other string is [`Op::Text`], and an
/// object is an [`Op::Embed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOp", into = "RawOp")]
pub enum Op {
    Text {
        text: String,
        attributes: Option<AttributeSet>,
    },
    LineBreak {
        attributes: Option<AttributeSet>,
    },
    Embed {
        payload: Value,
        attributes: Option<AttributeSet>,
    },
}

impl Op {
    pub fn text(text: impl Into<String>) -> Self {
        Op::Text {
            text: text.into(),
            attributes: None,
        }
    }

    pub fn text_with(text: impl Into<String>, attributes: AttributeSet) -> Self {
        Op::Text {
            text: text.into(),
            attributes: Some(attributes),
        }
    }

    pub fn line_break() -> Self {
        Op::LineBreak { attributes: None }
    }

    pub fn line_break_with(attributes: AttributeSet) -> Self {
        Op::LineBreak {
            attributes: Some(attributes),
        }
    }

    pub fn embed(payload: Value, attributes: Option<AttributeSet>) -> Self {
        Op::Embed {
            payload,
            attributes,
        }
    }

    pub fn attributes(&self) -> Option<&AttributeSet> {
        match self {
            Op::Text { attributes, .. }
            | Op::LineBreak { attributes }
            | Op::Embed { attributes, .. } => attributes.as_ref(),
        }
    }

    /// True for a line break op, or a text op whose whole content is `"\n"`.
    pub fn is_line_break(&self) -> bool {
        match self {
            Op::LineBreak { .. } => true,
            Op::Text { text, .. } => text == "\n",
            Op::Embed { .. } => false,
        }
    }

    /// List kind carried by this op's attributes, if any.
    pub fn list_kind(&self) -> Option<ListKind> {
        self.attributes().and_then(ListKind::from_attributes)
    }
}

/// Wire shape of an op.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawOp {
    insert: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attributes: Option<AttributeSet>,
}

impl TryFrom<RawOp> for Op {
    type Error = String;

    fn try_from(raw: RawOp) -> std::result::Result<Self, Self::Error> {
        match raw.insert {
            Value::String(text) if text == "\n" => Ok(Op::LineBreak {
                attributes: raw.attributes,
            }),
            Value::String(text) => Ok(Op::Text {
                text,
                attributes: raw.attributes,
            }),
            payload @ Value::Object(_) => Ok(Op::Embed {
                payload,
                attributes: raw.attributes,
            }),
            other => Err(format!(
                "insert must be a string or an object, got {}",
                other
            )),
        }
    }
}

impl From<Op> for RawOp {
    fn from(op: Op) -> Self {
        match op {
            Op::Text { text, attributes } => RawOp {
                insert: Value::String(text),
                attributes,
            },
            Op::LineBreak { attributes } => RawOp {
                insert: Value::String("\n".to_string()),
                attributes,
            },
            Op::Embed {
                payload,
                attributes,
            } => RawOp {
                insert: payload,
                attributes,
            },
        }
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// A rich-text document: an ordered list of insert operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub ops: Vec<Op>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ops(ops: Vec<Op>) -> Self {
        Self { ops }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Parse a serialized delta string.
    pub fn parse(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::InvalidDocument(format!("Could not parse JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Validate and convert a JSON value into a delta.
    ///
    /// Rejects anything that is not an object, lacks an `ops` array, or has
    /// an empty `ops` array.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::InvalidDocument("Not a valid object".to_string()))?;

        let ops = object
            .get("ops")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::InvalidDocument("Missing ops array".to_string()))?;

        if ops.is_empty() {
            return Err(Error::InvalidDocument("Empty ops array".to_string()));
        }

        serde_json::from_value(value.clone())
            .map_err(|e| Error::InvalidDocument(format!("Malformed operation: {}", e)))
    }

    /// Serialize to the `{"ops": [...]}` wire shape.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Append a text run, merging into the previous run when the attributes
    /// match. Empty text is dropped.
    pub fn push_text(&mut self, text: &str, attributes: Option<AttributeSet>) {
        if text.is_empty() {
            return;
        }
        if let Some(Op::Text {
            text: last_text,
            attributes: last_attributes,
        }) = self.ops.last_mut()
        {
            if last_text != "\n" && *last_attributes == attributes {
                last_text.push_str(text);
                return;
            }
        }
        self.ops.push(Op::Text {
            text: text.to_string(),
            attributes,
        });
    }

    pub fn push_line_break(&mut self, attributes: Option<AttributeSet>) {
        self.ops.push(Op::LineBreak { attributes });
    }

    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Number of line break ops.
    pub fn line_break_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_line_break()).count()
    }

    /// Line break ops tagged with the given list kind.
    pub fn list_item_count(&self, kind: ListKind) -> usize {
        self.ops
            .iter()
            .filter(|op| op.is_line_break() && op.list_kind() == Some(kind))
            .count()
    }
}

/// Split text on `\n`, dropping the empty segment after a trailing newline.
///
/// Returns the lines and whether the text ended with a newline. Empty text is
/// a single empty line.
pub(crate) fn split_lines(text: &str) -> (Vec<&str>, bool) {
    let ends_with_newline = text.ends_with('\n');
    let mut lines: Vec<&str> = text.split('\n').collect();
    if ends_with_newline {
        lines.pop();
    }
    (lines, ends_with_newline)
}

/// Slice a char vector by char offsets, clamping to bounds.
pub(crate) fn slice_chars(chars: &[char], from: usize, to: usize) -> String {
    let to = to.min(chars.len());
    if from >= to {
        return String::new();
    }
    chars[from..to].iter().collect()
}
