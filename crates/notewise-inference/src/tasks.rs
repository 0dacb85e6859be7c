//! Actionable task extraction.

use std::time::Instant;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use notewise_core::{Error, ExtractedTask, GenerationBackend, Result};

use crate::config::{InferenceOperation, ModelRoles};
use crate::prompts::TASK_EXTRACTION_SYSTEM;
use crate::response::parse_json;

/// Find calendar, email and to-do tasks in `text`.
///
/// An unreadable model answer yields no tasks; only a failed call is an
/// error.
#[instrument(
    skip(backend, roles, text),
    fields(
        subsystem = "inference",
        component = "tasks",
        op = "extract_tasks",
        model = %roles.model_for(InferenceOperation::ExtractTasks),
        prompt_len = text.len(),
    )
)]
pub async fn extract_tasks<B>(backend: &B, roles: &ModelRoles, text: &str) -> Result<Vec<ExtractedTask>>
where
    B: GenerationBackend + ?Sized,
{
    if text.trim().is_empty() {
        return Err(Error::InvalidContent("Text is required".to_string()));
    }

    let start = Instant::now();
    let options = roles.options_for(InferenceOperation::ExtractTasks);
    let raw = backend
        .generate_with_options(Some(TASK_EXTRACTION_SYSTEM), text, &options)
        .await
        .map_err(|e| Error::Inference(format!("Failed to extract tasks: {}", e)))?;

    let tasks = match parse_json::<Value>(&raw) {
        Ok(value) => tasks_from_value(value),
        Err(e) => {
            warn!(error = %e, response_len = raw.len(), "Unreadable task extraction response");
            Vec::new()
        }
    };

    debug!(
        item_count = tasks.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Task extraction complete"
    );
    Ok(tasks)
}

/// Accept `{"tasks": [...]}` or a bare array; drop items that do not fit.
fn tasks_from_value(value: Value) -> Vec<ExtractedTask> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("tasks") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<ExtractedTask>(item) {
            Ok(task) => Some(task),
            Err(e) => {
                debug!(error = %e, "Skipping malformed task");
                None
            }
        })
        .collect()
}
