//! Natural-language date-time parsing.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, instrument, warn};

use notewise_core::{defaults, Error, GenerationBackend, ParsedDateTime, Result};

use crate::config::{InferenceOperation, ModelRoles};
use crate::prompts::datetime_system;
use crate::response::parse_json;

/// Reason reported when the model answer cannot be decoded.
pub const UNREADABLE_RESPONSE: &str = "Error parsing the AI response";

/// Resolve the date or time mentioned in `text` relative to `reference_time`.
///
/// `timezone` is an IANA name passed to the model as context; `UTC` when
/// absent. The original text is always attached to the result.
#[instrument(
    skip(backend, roles, text),
    fields(
        subsystem = "inference",
        component = "datetime",
        op = "parse_datetime",
        model = %roles.model_for(InferenceOperation::ParseDatetime),
        prompt_len = text.len(),
    )
)]
pub async fn parse_datetime<B>(
    backend: &B,
    roles: &ModelRoles,
    text: &str,
    reference_time: DateTime<Utc>,
    timezone: Option<&str>,
) -> Result<ParsedDateTime>
where
    B: GenerationBackend + ?Sized,
{
    if text.trim().is_empty() {
        return Err(Error::InvalidContent("Text is required".to_string()));
    }

    let timezone = timezone
        .map(str::trim)
        .filter(|tz| !tz.is_empty())
        .unwrap_or(defaults::TIMEZONE);
    let reference = reference_time.to_rfc3339_opts(SecondsFormat::Millis, true);
    let system = datetime_system(&reference, timezone);
    let options = roles.options_for(InferenceOperation::ParseDatetime);

    let raw = backend
        .generate_with_options(Some(system.as_str()), text, &options)
        .await
        .map_err(|e| Error::Inference(format!("Failed to parse date-time: {}", e)))?;

    let mut result = match parse_json::<ParsedDateTime>(&raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, response_len = raw.len(), "Unreadable date-time response");
            ParsedDateTime::unparsed(UNREADABLE_RESPONSE)
        }
    };
    result.original_text = Some(text.to_string());

    debug!(parsed = result.parsed, timezone, "Date-time parsing complete");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerationBackend;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 24, 10, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_parse_datetime_success() {
        let backend = MockGenerationBackend::new().with_fixed_response(
            r#"{"parsed": true, "iso": "2024-04-25T15:00:00Z",
                "components": {"year": 2024, "month": 4, "day": 25, "hour": 15, "minute": 0, "second": 0},
                "formatted": "April 25, 2024 at 3:00 PM"}"#,
        );

        let result = parse_datetime(
            &backend,
            &ModelRoles::default(),
            "tomorrow at 3pm",
            reference(),
            Some("Europe/Lisbon"),
        )
        .await
        .unwrap();

        assert!(result.parsed);
        assert_eq!(result.iso.as_deref(), Some("2024-04-25T15:00:00Z"));
        assert_eq!(result.components.unwrap().hour, 15);
        assert_eq!(result.original_text.as_deref(), Some("tomorrow at 3pm"));

        let calls = backend.get_calls();
        let system = calls[0].system.as_deref().unwrap();
        assert!(system.contains("2024-04-24T10:00:00.000Z"));
        assert!(system.contains("Europe/Lisbon"));
        assert_eq!(calls[0].options.temperature, Some(0.1));
        assert!(!calls[0].options.json);
    }

    #[tokio::test]
    async fn test_default_timezone_is_utc() {
        let backend = MockGenerationBackend::new()
            .with_fixed_response(r#"{"parsed": false, "reason": "No date or time found in text"}"#);

        let result = parse_datetime(&backend, &ModelRoles::default(), "hello", reference(), None)
            .await
            .unwrap();

        assert!(!result.parsed);
        assert_eq!(result.reason.as_deref(), Some("No date or time found in text"));
        let calls = backend.get_calls();
        assert!(calls[0].system.as_deref().unwrap().contains("User timezone: UTC"));
    }

    #[tokio::test]
    async fn test_fenced_response_is_accepted() {
        let backend = MockGenerationBackend::new()
            .with_fixed_response("```json\n{\"parsed\": false, \"reason\": \"none\"}\n```");
        let result = parse_datetime(&backend, &ModelRoles::default(), "x", reference(), None)
            .await
            .unwrap();
        assert_eq!(result.reason.as_deref(), Some("none"));
    }

    #[tokio::test]
    async fn test_unreadable_response_is_unparsed() {
        let backend = MockGenerationBackend::new().with_fixed_response("It is next Tuesday.");
        let result = parse_datetime(&backend, &ModelRoles::default(), "next tuesday", reference(), None)
            .await
            .unwrap();

        assert!(!result.parsed);
        assert_eq!(result.reason.as_deref(), Some(UNREADABLE_RESPONSE));
        assert_eq!(result.original_text.as_deref(), Some("next tuesday"));
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected() {
        let backend = MockGenerationBackend::new();
        let err = parse_datetime(&backend, &ModelRoles::default(), "", reference(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidContent(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_inference_error() {
        let backend = MockGenerationBackend::new().with_failure_rate(1.0);
        let err = parse_datetime(&backend, &ModelRoles::default(), "friday", reference(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }
}
