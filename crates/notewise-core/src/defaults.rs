//! Centralized default constants for notewise.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// INFERENCE
// =============================================================================

/// Default OpenAI-compatible API base URL.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default model for enhancement, date-time parsing and attendee extraction.
pub const GEN_MODEL: &str = "gpt-4o-mini";

/// Default model for task extraction and to-do conversion.
pub const TASK_DETECTION_MODEL: &str = "gpt-4o";

/// Timeout for generation requests in seconds. Bounds the rewrite call.
pub const GEN_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// SAMPLING TEMPERATURES
// =============================================================================

/// Text enhancement: some freedom in phrasing.
pub const ENHANCE_TEMPERATURE: f32 = 0.3;

/// Task extraction and to-do conversion.
pub const TASK_TEMPERATURE: f32 = 0.2;

/// Attendee extraction.
pub const ATTENDEE_TEMPERATURE: f32 = 0.2;

/// Date-time parsing: as deterministic as the provider allows.
pub const DATETIME_TEMPERATURE: f32 = 0.1;

// =============================================================================
// DATE-TIME
// =============================================================================

/// Timezone assumed when the caller gives none.
pub const TIMEZONE: &str = "UTC";

// =============================================================================
// SERVER
// =============================================================================

/// Default bind address.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default listen port.
pub const SERVER_PORT: u16 = 3000;

/// Default `RUST_LOG` filter for the API server.
pub const LOG_FILTER: &str = "notewise_api=debug,tower_http=debug";
