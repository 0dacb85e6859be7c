//! Structured logging schema and field name constants for notewise.
//!
//! All crates use these names for structured `tracing` fields so log
//! aggregation can query the same keys across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, fallback applied (unparsable model output) |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points: routing, formats, line counts, model choice |
//! | TRACE | High-volume data (raw model responses) |
//!
//! The delta engine itself never logs; the orchestrator and the inference
//! adapters log at their boundaries.

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the HTTP request. Format: UUIDv7.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "core", "inference"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "enhancer", "openai", "rewriter", "tasks"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "enhance", "generate", "extract_tasks", "parse_datetime"
pub const OPERATION: &str = "op";

// ─── Content fields ────────────────────────────────────────────────────────

/// Content format of the request ("plain", "delta").
pub const FORMAT: &str = "format";

/// Whether a delta was routed to the list-preserving rebuild.
pub const LIST_LIKE: &str = "list_like";

/// Number of lines in the rewritten text.
pub const LINE_COUNT: &str = "line_count";

/// Number of items produced (tasks, attendees, links).
pub const ITEM_COUNT: &str = "item_count";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

/// Whether JSON-object response mode was requested.
pub const JSON_MODE: &str = "json_mode";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Every field name above, for schema checks.
pub const ALL_FIELDS: &[&str] = &[
    REQUEST_ID,
    SUBSYSTEM,
    COMPONENT,
    OPERATION,
    FORMAT,
    LIST_LIKE,
    LINE_COUNT,
    ITEM_COUNT,
    DURATION_MS,
    PROMPT_LEN,
    RESPONSE_LEN,
    MODEL,
    JSON_MODE,
    SUCCESS,
    ERROR_MSG,
];
