//! OpenAI-compatible generation backend.
//!
//! Works with any endpoint that speaks the chat-completions API, including:
//!
//! - OpenAI cloud API
//! - Azure OpenAI
//! - OpenRouter
//! - Ollama (in OpenAI compatibility mode)
//! - vLLM, LocalAI, LM Studio
//!
//! # Example
//!
//! ```rust,no_run
//! use notewise_core::GenerationBackend;
//! use notewise_inference::openai::{OpenAIBackend, OpenAIConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     // From environment variables
//!     let backend = OpenAIBackend::from_env().unwrap();
//!
//!     // Or against a local endpoint
//!     let config = OpenAIConfig {
//!         base_url: "http://localhost:11434/v1".to_string(),
//!         gen_model: "llama3".to_string(),
//!         ..Default::default()
//!     };
//!     let local = OpenAIBackend::new(config).unwrap();
//!
//!     let reply = local.generate("Say hello").await.unwrap();
//!     println!("{} / {}", reply, backend.model_name());
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{
    OpenAIBackend, OpenAIConfig, DEFAULT_GEN_MODEL, DEFAULT_OPENAI_URL, DEFAULT_TIMEOUT_SECS,
};
pub use error::{to_core_error, OpenAIErrorCode};
pub use types::*;
