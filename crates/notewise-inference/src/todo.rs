//! Split a note into to-do items and the remaining prose.

use std::time::Instant;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use notewise_core::{
    extract_text, ContentFormat, Delta, DocumentContent, Error, GenerationBackend, ListKind,
    Result, TodoConversion, TodoTasks,
};

use crate::config::{InferenceOperation, ModelRoles};
use crate::prompts::TODO_SYSTEM;
use crate::response::parse_json;

#[derive(Debug, Default, Deserialize)]
struct TodoResponse {
    #[serde(default)]
    tasks: Vec<Value>,
    #[serde(default)]
    regular_text: Option<String>,
}

/// Convert `content` into to-do items plus regular text, returned in `format`.
///
/// Delta input is flattened with the analyzer's projection first. With
/// `format = delta`, tasks come back as an unchecked checklist and the
/// regular text as plain lines.
#[instrument(
    skip(backend, roles, content),
    fields(
        subsystem = "inference",
        component = "todo",
        op = "convert_todo",
        model = %roles.model_for(InferenceOperation::ConvertTodo),
    )
)]
pub async fn convert_to_todo<B>(
    backend: &B,
    roles: &ModelRoles,
    content: &DocumentContent,
    format: ContentFormat,
) -> Result<TodoConversion>
where
    B: GenerationBackend + ?Sized,
{
    let text = match content {
        DocumentContent::Plain(text) => text.clone(),
        DocumentContent::Delta(doc) => extract_text(doc),
    };
    if text.trim().is_empty() {
        return Err(Error::InvalidContent("No valid content to process".to_string()));
    }

    let start = Instant::now();
    let options = roles.options_for(InferenceOperation::ConvertTodo);
    let raw = backend
        .generate_with_options(Some(TODO_SYSTEM), &text, &options)
        .await
        .map_err(|e| Error::Inference(format!("Failed to convert to todo: {}", e)))?;

    let response: TodoResponse = parse_json(&raw).map_err(|e| {
        warn!(error = %e, response_len = raw.len(), "Unreadable to-do response");
        Error::Inference(format!("Failed to convert to todo: {}", e))
    })?;

    let tasks: Vec<String> = response
        .tasks
        .into_iter()
        .filter_map(|task| match task {
            Value::String(task) if !task.trim().is_empty() => Some(task.trim().to_string()),
            _ => None,
        })
        .collect();
    let regular_text = response.regular_text.unwrap_or_default();

    debug!(
        item_count = tasks.len(),
        format = %format,
        duration_ms = start.elapsed().as_millis() as u64,
        "To-do conversion complete"
    );

    Ok(match format {
        ContentFormat::Delta => TodoConversion {
            tasks: TodoTasks::Delta(tasks_to_delta(&tasks)),
            regular_text: DocumentContent::Delta(text_to_delta(&regular_text)),
            format,
        },
        ContentFormat::Plain => TodoConversion {
            tasks: TodoTasks::Plain(tasks),
            regular_text: DocumentContent::Plain(regular_text),
            format,
        },
    })
}

/// One unchecked checklist line per task.
pub fn tasks_to_delta(tasks: &[String]) -> Delta {
    let mut doc = Delta::new();
    for task in tasks {
        doc.push_text(task, None);
        doc.push_line_break(Some(ListKind::Unchecked.to_attributes()));
    }
    doc
}

/// One plain line break per line; empty text gives an empty delta.
pub fn text_to_delta(text: &str) -> Delta {
    let mut doc = Delta::new();
    for line in text.split_terminator('\n') {
        doc.push_text(line, None);
        doc.push_line_break(None);
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerationBackend;
    use notewise_core::{doc_to_plain, Op};
    use serde_json::json;

    const RESPONSE: &str =
        r#"{"tasks": ["Buy milk", "Call the bank"], "regular_text": "Weekend plans.\nRelax."}"#;

    #[tokio::test]
    async fn test_plain_conversion() {
        let backend = MockGenerationBackend::new().with_fixed_response(RESPONSE);
        let content = DocumentContent::Plain("Weekend plans. Buy milk, call the bank. Relax.".into());

        let result = convert_to_todo(&backend, &ModelRoles::default(), &content, ContentFormat::Plain)
            .await
            .unwrap();

        assert_eq!(
            result.tasks,
            TodoTasks::Plain(vec!["Buy milk".into(), "Call the bank".into()])
        );
        assert_eq!(
            result.regular_text,
            DocumentContent::Plain("Weekend plans.\nRelax.".into())
        );
        assert_eq!(result.format, ContentFormat::Plain);

        let calls = backend.get_calls();
        assert_eq!(calls[0].options.model.as_deref(), Some("gpt-4o"));
        assert!(calls[0].options.json);
    }

    #[tokio::test]
    async fn test_delta_conversion_builds_checklist() {
        let backend = MockGenerationBackend::new().with_fixed_response(RESPONSE);
        let doc = Delta::from_value(&json!({"ops": [
            {"insert": "Weekend plans", "attributes": {"bold": true}},
            {"insert": "\nbuy milk\n"}
        ]}))
        .unwrap();

        let result = convert_to_todo(
            &backend,
            &ModelRoles::default(),
            &DocumentContent::Delta(doc),
            ContentFormat::Delta,
        )
        .await
        .unwrap();

        assert_eq!(backend.get_calls()[0].prompt, "Weekend plans\nbuy milk\n");
        match result.tasks {
            TodoTasks::Delta(tasks) => {
                assert_eq!(tasks.list_item_count(ListKind::Unchecked), 2);
                assert_eq!(doc_to_plain(&tasks), "Buy milk\nCall the bank\n");
            }
            other => panic!("expected delta tasks, got {:?}", other),
        }
        let regular = result.regular_text.as_delta().unwrap();
        assert_eq!(doc_to_plain(regular), "Weekend plans.\nRelax.\n");
        assert_eq!(regular.line_break_count(), 2);
    }

    #[tokio::test]
    async fn test_no_tasks_and_empty_text_in_delta() {
        let backend =
            MockGenerationBackend::new().with_fixed_response(r#"{"tasks": [], "regular_text": ""}"#);
        let result = convert_to_todo(
            &backend,
            &ModelRoles::default(),
            &DocumentContent::Plain("hello".into()),
            ContentFormat::Delta,
        )
        .await
        .unwrap();

        assert_eq!(result.tasks, TodoTasks::Delta(Delta::new()));
        assert_eq!(result.regular_text, DocumentContent::Delta(Delta::new()));
    }

    #[tokio::test]
    async fn test_blank_content_is_rejected() {
        let backend = MockGenerationBackend::new();
        let doc = Delta::from_value(&json!({"ops": [{"insert": {"image": "a.png"}}]})).unwrap();

        for content in [DocumentContent::Plain("  ".into()), DocumentContent::Delta(doc)] {
            let err = convert_to_todo(&backend, &ModelRoles::default(), &content, ContentFormat::Plain)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidContent(_)));
        }
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_response_is_an_inference_error() {
        let backend = MockGenerationBackend::new().with_fixed_response("- buy milk");
        let err = convert_to_todo(
            &backend,
            &ModelRoles::default(),
            &DocumentContent::Plain("buy milk".into()),
            ContentFormat::Plain,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[test]
    fn test_tasks_to_delta_shape() {
        let doc = tasks_to_delta(&["One".to_string()]);
        assert_eq!(
            doc.ops,
            vec![
                Op::text("One"),
                Op::line_break_with(ListKind::Unchecked.to_attributes()),
            ]
        );
    }

    #[test]
    fn test_text_to_delta_keeps_blank_lines() {
        let doc = text_to_delta("a\n\nb");
        assert_eq!(
            doc.ops,
            vec![
                Op::text("a"),
                Op::line_break(),
                Op::line_break(),
                Op::text("b"),
                Op::line_break(),
            ]
        );
    }
}
