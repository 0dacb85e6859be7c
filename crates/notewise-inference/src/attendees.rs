//! Meeting attendee extraction.
//!
//! Best-effort: a failed call or an unreadable answer degrades to an empty
//! list with an explanation instead of an error.

use std::time::Instant;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use notewise_core::{Attendee, AttendeeExtraction, Error, GenerationBackend, Result};

use crate::config::{InferenceOperation, ModelRoles};
use crate::prompts::{ATTENDEE_DETAILS_SYSTEM, ATTENDEE_NAMES_SYSTEM};
use crate::response::parse_json;

/// Explanation attached when extraction could not be completed.
pub const DEGRADED_EXPLANATION: &str = "Error processing request";

/// Find people in `text` who could attend a meeting.
///
/// With `include_details`, each attendee carries role, affiliation,
/// relationship and contact when the text gives them, and the result has
/// an explanation. Without it, attendees carry names only.
#[instrument(
    skip(backend, roles, text),
    fields(
        subsystem = "inference",
        component = "attendees",
        op = "extract_attendees",
        model = %roles.model_for(InferenceOperation::ExtractAttendees),
        prompt_len = text.len(),
    )
)]
pub async fn extract_attendees<B>(
    backend: &B,
    roles: &ModelRoles,
    text: &str,
    include_details: bool,
) -> Result<AttendeeExtraction>
where
    B: GenerationBackend + ?Sized,
{
    if text.trim().is_empty() {
        return Err(Error::InvalidContent("Text is required".to_string()));
    }

    let start = Instant::now();
    let system = if include_details {
        ATTENDEE_DETAILS_SYSTEM
    } else {
        ATTENDEE_NAMES_SYSTEM
    };
    let options = roles.options_for(InferenceOperation::ExtractAttendees);

    let raw = match backend.generate_with_options(Some(system), text, &options).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Attendee extraction call failed");
            return Ok(degraded());
        }
    };

    let extraction = match parse_json::<Value>(&raw) {
        Ok(value) => from_value(value, include_details),
        Err(e) => {
            warn!(error = %e, response_len = raw.len(), "Unreadable attendee response");
            degraded()
        }
    };

    debug!(
        item_count = extraction.attendees.len(),
        include_details,
        duration_ms = start.elapsed().as_millis() as u64,
        "Attendee extraction complete"
    );
    Ok(extraction)
}

fn degraded() -> AttendeeExtraction {
    AttendeeExtraction {
        attendees: Vec::new(),
        explanation: Some(DEGRADED_EXPLANATION.to_string()),
    }
}

/// Accept `{"attendees": [...], "explanation": ...}` or a bare array.
/// Items may be names or attendee objects.
fn from_value(value: Value, include_details: bool) -> AttendeeExtraction {
    let (items, explanation) = match value {
        Value::Array(items) => (items, None),
        Value::Object(mut object) => {
            let explanation = object
                .remove("explanation")
                .and_then(|e| e.as_str().map(str::to_string));
            let items = match object.remove("attendees") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };
            (items, explanation)
        }
        _ => (Vec::new(), None),
    };

    let attendees = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(name) if !name.trim().is_empty() => Some(Attendee::named(name.trim())),
            Value::Object(_) => serde_json::from_value::<Attendee>(item).ok(),
            _ => None,
        })
        .map(|attendee| {
            if include_details {
                attendee
            } else {
                Attendee::named(attendee.name)
            }
        })
        .collect();

    AttendeeExtraction {
        attendees,
        explanation: if include_details { explanation } else { None },
    }
}
