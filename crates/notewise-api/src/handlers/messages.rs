//! Message content conversion.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;

use notewise_core::{text_conversions, Delta, TextConversion};

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub text_content: Option<String>,
    /// Delta object or serialized delta string.
    #[serde(default)]
    pub delta_content: Option<Value>,
}

/// POST /api/messages/convert
///
/// Fills in whichever of text/delta is missing and lists the links found.
/// The delta wins when both are given.
pub async fn convert(
    State(_state): State<AppState>,
    Json(body): Json<ConvertRequest>,
) -> Result<Json<TextConversion>, ApiError> {
    let delta = match body.delta_content {
        None | Some(Value::Null) => None,
        Some(Value::String(serialized)) => Some(Delta::parse(&serialized)?),
        Some(value) => Some(Delta::from_value(&value)?),
    };

    if delta.is_none() && body.text_content.is_none() {
        return Err(ApiError::BadRequest(
            "text_content or delta_content is required".to_string(),
        ));
    }

    Ok(Json(text_conversions(
        body.text_content.as_deref(),
        delta.as_ref(),
    )))
}
