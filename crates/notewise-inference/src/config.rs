//! Per-operation model and sampling configuration.
//!
//! Every AI feature runs on one of two models: the default model (text
//! enhancement, date-time parsing, attendee extraction) or the
//! task-detection model (task extraction, to-do conversion). Both can be
//! overridden from the environment.
//!
//! # Example
//!
//! ```rust
//! use notewise_inference::config::{InferenceOperation, ModelRoles};
//!
//! let roles = ModelRoles::default();
//! assert_eq!(roles.model_for(InferenceOperation::ExtractTasks), "gpt-4o");
//! assert!(roles.options_for(InferenceOperation::ExtractTasks).json);
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use notewise_core::{defaults, GenerationOptions};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for notewise_core::Error {
    fn from(e: ConfigError) -> Self {
        notewise_core::Error::Config(e.to_string())
    }
}

/// AI operations that reach the generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceOperation {
    /// Grammar and clarity rewrite of note text.
    Enhance,
    /// Actionable task detection.
    ExtractTasks,
    /// Natural-language date-time resolution.
    ParseDatetime,
    /// Meeting attendee detection.
    ExtractAttendees,
    /// Split text into to-do items and remaining prose.
    ConvertTodo,
}

impl InferenceOperation {
    pub const ALL: [InferenceOperation; 5] = [
        Self::Enhance,
        Self::ExtractTasks,
        Self::ParseDatetime,
        Self::ExtractAttendees,
        Self::ConvertTodo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enhance => "enhance",
            Self::ExtractTasks => "extract_tasks",
            Self::ParseDatetime => "parse_datetime",
            Self::ExtractAttendees => "extract_attendees",
            Self::ConvertTodo => "convert_todo",
        }
    }

    /// Sampling temperature for this operation.
    pub fn temperature(&self) -> f32 {
        match self {
            Self::Enhance => defaults::ENHANCE_TEMPERATURE,
            Self::ExtractTasks | Self::ConvertTodo => defaults::TASK_TEMPERATURE,
            Self::ParseDatetime => defaults::DATETIME_TEMPERATURE,
            Self::ExtractAttendees => defaults::ATTENDEE_TEMPERATURE,
        }
    }

    /// Whether the provider is asked for a JSON object response.
    ///
    /// Date-time parsing asks for JSON in the prompt only; its output is
    /// cleaned and parsed leniently.
    pub fn wants_json(&self) -> bool {
        matches!(
            self,
            Self::ExtractTasks | Self::ExtractAttendees | Self::ConvertTodo
        )
    }

    /// Whether this operation runs on the task-detection model.
    pub fn uses_task_model(&self) -> bool {
        matches!(self, Self::ExtractTasks | Self::ConvertTodo)
    }
}

impl fmt::Display for InferenceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InferenceOperation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s.to_lowercase())
            .ok_or_else(|| ConfigError::UnknownOperation(s.to_string()))
    }
}

/// Which model serves which operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRoles {
    /// Model for enhancement, date-time parsing and attendee extraction.
    pub default_model: String,
    /// Model for task extraction and to-do conversion.
    pub task_detection_model: String,
}

impl Default for ModelRoles {
    fn default() -> Self {
        Self {
            default_model: defaults::GEN_MODEL.to_string(),
            task_detection_model: defaults::TASK_DETECTION_MODEL.to_string(),
        }
    }
}

impl ModelRoles {
    /// Load from `AI_DEFAULT_MODEL` and `AI_TASK_DETECTION_MODEL`.
    pub fn from_env() -> Self {
        let fallback = Self::default();
        let roles = Self {
            default_model: non_empty_var("AI_DEFAULT_MODEL").unwrap_or(fallback.default_model),
            task_detection_model: non_empty_var("AI_TASK_DETECTION_MODEL")
                .unwrap_or(fallback.task_detection_model),
        };
        debug!(
            default_model = %roles.default_model,
            task_detection_model = %roles.task_detection_model,
            "Loaded model roles"
        );
        roles
    }

    /// Model used for `operation`.
    pub fn model_for(&self, operation: InferenceOperation) -> &str {
        if operation.uses_task_model() {
            &self.task_detection_model
        } else {
            &self.default_model
        }
    }

    /// Full generation options for `operation`.
    pub fn options_for(&self, operation: InferenceOperation) -> GenerationOptions {
        let options = GenerationOptions::default()
            .with_model(self.model_for(operation))
            .with_temperature(operation.temperature());
        if operation.wants_json() {
            options.json()
        } else {
            options
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default_model cannot be empty".to_string(),
            ));
        }
        if self.task_detection_model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "task_detection_model cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
