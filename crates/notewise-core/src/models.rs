//! Request and result models shared across notewise crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::delta::Delta;
use crate::error::{Error, Result};

// =============================================================================
// CONTENT
// =============================================================================

/// Wire format of message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Plain,
    Delta,
}

impl ContentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFormat::Plain => "plain",
            ContentFormat::Delta => "delta",
        }
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plain" => Ok(ContentFormat::Plain),
            "delta" => Ok(ContentFormat::Delta),
            other => Err(Error::InvalidInput(format!(
                "Unknown content format: {}",
                other
            ))),
        }
    }
}

/// Content in either wire format. Serializes as a bare string or a bare
/// delta object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentContent {
    Delta(Delta),
    Plain(String),
}

impl DocumentContent {
    pub fn format(&self) -> ContentFormat {
        match self {
            DocumentContent::Delta(_) => ContentFormat::Delta,
            DocumentContent::Plain(_) => ContentFormat::Plain,
        }
    }

    pub fn as_delta(&self) -> Option<&Delta> {
        match self {
            DocumentContent::Delta(delta) => Some(delta),
            DocumentContent::Plain(_) => None,
        }
    }

    pub fn as_plain(&self) -> Option<&str> {
        match self {
            DocumentContent::Plain(text) => Some(text),
            DocumentContent::Delta(_) => None,
        }
    }
}

/// Outcome of one enhancement call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhanceResult {
    pub enhanced: DocumentContent,
    pub original: DocumentContent,
    pub format: ContentFormat,
}

/// A message's text and delta forms plus the links found in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextConversion {
    pub text_content: Option<String>,
    pub delta_content: Option<Delta>,
    pub links: Vec<String>,
}

// =============================================================================
// TASKS
// =============================================================================

/// Kind of actionable item found in free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// Events and meetings.
    Calendar,
    /// Messages to send.
    Email,
    /// Plain action items.
    Todo,
}

/// An actionable task extracted from text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTask {
    pub title: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    /// Free-form details; shape depends on the task type.
    #[serde(default)]
    pub details: JsonValue,
    #[serde(default)]
    pub people: Vec<String>,
}

// =============================================================================
// DATE-TIME
// =============================================================================

/// Calendar components of a parsed date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeComponents {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
    #[serde(default)]
    pub second: u32,
}

/// Result of natural-language date-time parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDateTime {
    pub parsed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<DateTimeComponents>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
}

impl ParsedDateTime {
    /// A failed parse with the given reason.
    pub fn unparsed(reason: impl Into<String>) -> Self {
        Self {
            parsed: false,
            reason: Some(reason.into()),
            ..Default::default()
        }
    }
}

// =============================================================================
// ATTENDEES
// =============================================================================

/// A person who may attend a meeting mentioned in text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Attendee {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Attendees found in text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendeeExtraction {
    pub attendees: Vec<Attendee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

// =============================================================================
// TO-DO CONVERSION
// =============================================================================

/// Tasks of a to-do conversion: bare strings, or a checklist delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoTasks {
    Delta(Delta),
    Plain(Vec<String>),
}

/// Text split into to-do items and the remaining prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoConversion {
    pub tasks: TodoTasks,
    pub regular_text: DocumentContent,
    pub format: ContentFormat,
}
