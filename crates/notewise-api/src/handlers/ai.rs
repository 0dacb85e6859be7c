//! AI text feature endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use notewise_core::{ContentFormat, Delta, DocumentContent, Error};
use notewise_inference as inference;

use crate::{ApiError, AppState};

/// Body of `/api/ai/enhance` and `/api/ai/convert-todo`.
#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractTasksRequest {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ParseDatetimeRequest {
    #[serde(default)]
    pub text: Option<String>,
    /// RFC 3339 timestamp; now when absent.
    #[serde(default)]
    pub reference_time: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractAttendeesRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default = "default_include_details")]
    pub include_details: bool,
}

fn default_include_details() -> bool {
    true
}

/// Content must be present and non-null.
fn required_content(content: Option<Value>) -> Result<Value, ApiError> {
    match content {
        Some(Value::Null) | None => Err(ApiError::BadRequest("Content is required".to_string())),
        Some(content) => Ok(content),
    }
}

/// Explicit format wins; otherwise an object means delta and anything else
/// means plain.
fn resolve_format(content: &Value, format: Option<&str>) -> Result<ContentFormat, ApiError> {
    match format {
        Some(format) => Ok(format.parse::<ContentFormat>()?),
        None if content.is_object() => Ok(ContentFormat::Delta),
        None => Ok(ContentFormat::Plain),
    }
}

fn document_content(content: &Value, format: ContentFormat) -> Result<DocumentContent, Error> {
    match (format, content) {
        (ContentFormat::Plain, Value::String(text)) => Ok(DocumentContent::Plain(text.clone())),
        (ContentFormat::Plain, _) => Err(Error::InvalidContent(
            "Content must be a string".to_string(),
        )),
        (ContentFormat::Delta, Value::String(serialized)) => {
            Ok(DocumentContent::Delta(Delta::parse(serialized)?))
        }
        (ContentFormat::Delta, other) => Ok(DocumentContent::Delta(Delta::from_value(other)?)),
    }
}

/// POST /api/ai/enhance
pub async fn enhance(
    State(state): State<AppState>,
    Json(body): Json<ContentRequest>,
) -> Result<Response, ApiError> {
    let content = required_content(body.content)?;
    let format = resolve_format(&content, body.format.as_deref())?;
    let result = state.enhancer.enhance(&content, format).await?;
    Ok(Json(result).into_response())
}

/// POST /api/ai/extract-tasks
pub async fn extract_tasks(
    State(state): State<AppState>,
    Json(body): Json<ExtractTasksRequest>,
) -> Result<Response, ApiError> {
    let content = body.content.unwrap_or_default();
    let tasks = inference::extract_tasks(state.backend.as_ref(), &state.roles, &content).await?;
    Ok(Json(serde_json::json!({ "tasks": tasks })).into_response())
}

/// POST /api/ai/parse-datetime
///
/// Answers 422 with the unparsed result when no date or time was found.
pub async fn parse_datetime(
    State(state): State<AppState>,
    Json(body): Json<ParseDatetimeRequest>,
) -> Result<Response, ApiError> {
    let reference_time = match body.reference_time.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| {
                ApiError::BadRequest("Reference time must be a valid ISO date string".to_string())
            })?,
        None => Utc::now(),
    };

    let text = body.text.unwrap_or_default();
    let result = inference::parse_datetime(
        state.backend.as_ref(),
        &state.roles,
        &text,
        reference_time,
        body.timezone.as_deref(),
    )
    .await?;

    let status = if result.parsed {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    Ok((status, Json(result)).into_response())
}

/// POST /api/ai/extract-attendees
pub async fn extract_attendees(
    State(state): State<AppState>,
    Json(body): Json<ExtractAttendeesRequest>,
) -> Result<Response, ApiError> {
    let text = body.text.unwrap_or_default();
    let result = inference::extract_attendees(
        state.backend.as_ref(),
        &state.roles,
        &text,
        body.include_details,
    )
    .await?;
    Ok(Json(result).into_response())
}

/// POST /api/ai/convert-todo
pub async fn convert_todo(
    State(state): State<AppState>,
    Json(body): Json<ContentRequest>,
) -> Result<Response, ApiError> {
    let content = required_content(body.content)?;
    let format = resolve_format(&content, body.format.as_deref())?;
    let document = document_content(&content, format)?;
    let result =
        inference::convert_to_todo(state.backend.as_ref(), &state.roles, &document, format)
            .await?;
    Ok(Json(result).into_response())
}
