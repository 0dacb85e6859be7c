//! # notewise-inference
//!
//! LLM adapters for notewise.
//!
//! This crate provides:
//! - An OpenAI-compatible [`GenerationBackend`](notewise_core::GenerationBackend)
//!   (feature `openai`, on by default)
//! - [`EnhancementRewriter`], the [`RewriteService`](notewise_core::RewriteService)
//!   behind text enhancement
//! - Task extraction, date-time parsing, attendee extraction and to-do
//!   conversion
//! - Per-operation model and temperature selection ([`config`])
//! - A deterministic mock backend for tests (feature `mock`)
//!
//! # Example
//!
//! ```rust,no_run
//! use notewise_core::{ContentFormat, TextEnhancer};
//! use notewise_inference::{EnhancementRewriter, ModelRoles, OpenAIBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAIBackend::from_env().unwrap();
//!     let enhancer = TextEnhancer::new(EnhancementRewriter::new(backend, ModelRoles::from_env()));
//!     let result = enhancer
//!         .enhance(&serde_json::json!("this are my note"), ContentFormat::Plain)
//!         .await
//!         .unwrap();
//!     println!("{:?}", result.enhanced);
//! }
//! ```

pub mod attendees;
pub mod config;
pub mod datetime;
pub mod prompts;
pub mod response;
pub mod rewrite;
pub mod tasks;
pub mod todo;

#[cfg(feature = "openai")]
pub mod openai;

// Mock generation backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use attendees::extract_attendees;
pub use config::{ConfigError, ConfigResult, InferenceOperation, ModelRoles};
pub use datetime::parse_datetime;
pub use rewrite::EnhancementRewriter;
pub use tasks::extract_tasks;
pub use todo::convert_to_todo;

#[cfg(feature = "openai")]
pub use openai::{OpenAIBackend, OpenAIConfig};
