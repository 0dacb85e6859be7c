//! LLM-backed [`RewriteService`] used by the text enhancer.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use notewise_core::{Error, GenerationBackend, Result, RewriteService};

use crate::config::{InferenceOperation, ModelRoles};
use crate::prompts::ENHANCE_SYSTEM;
use crate::response::strip_thinking;

/// Rewrites text for grammar and clarity with a single chat completion.
pub struct EnhancementRewriter<B> {
    backend: B,
    roles: ModelRoles,
}

impl<B: GenerationBackend> EnhancementRewriter<B> {
    pub fn new(backend: B, roles: ModelRoles) -> Self {
        Self { backend, roles }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait]
impl<B: GenerationBackend> RewriteService for EnhancementRewriter<B> {
    #[instrument(
        skip(self, text),
        fields(
            subsystem = "inference",
            component = "rewriter",
            op = "enhance",
            model = %self.roles.model_for(InferenceOperation::Enhance),
            prompt_len = text.len(),
        )
    )]
    async fn rewrite(&self, text: &str) -> Result<String> {
        let start = Instant::now();
        let options = self.roles.options_for(InferenceOperation::Enhance);

        let raw = self
            .backend
            .generate_with_options(Some(ENHANCE_SYSTEM), text, &options)
            .await
            .map_err(|e| Error::RewriteService(e.to_string()))?;

        let enhanced = strip_thinking(&raw);
        if enhanced.trim().is_empty() {
            warn!(
                duration_ms = start.elapsed().as_millis() as u64,
                "Model returned an empty rewrite"
            );
            return Err(Error::RewriteService(
                "Model returned an empty rewrite".to_string(),
            ));
        }

        debug!(
            response_len = enhanced.len(),
            input_lines = text.lines().count(),
            output_lines = enhanced.lines().count(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Rewrite generated"
        );
        Ok(enhanced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerationBackend;

    #[tokio::test]
    async fn test_rewrite_sends_enhance_prompt_and_options() {
        let backend = MockGenerationBackend::new().with_fixed_response("Buy milk.\nCall Ana.");
        let rewriter = EnhancementRewriter::new(backend, ModelRoles::default());

        let result = rewriter.rewrite("buy milk\ncall ana").await.unwrap();
        assert_eq!(result, "Buy milk.\nCall Ana.");

        let calls = rewriter.backend().get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system.as_deref(), Some(ENHANCE_SYSTEM));
        assert_eq!(calls[0].prompt, "buy milk\ncall ana");
        assert_eq!(calls[0].options.temperature, Some(0.3));
        assert_eq!(calls[0].options.model.as_deref(), Some("gpt-4o-mini"));
        assert!(!calls[0].options.json);
    }

    #[tokio::test]
    async fn test_rewrite_strips_thinking() {
        let backend =
            MockGenerationBackend::new().with_fixed_response("<think>fix caps</think>Hello.\n");
        let rewriter = EnhancementRewriter::new(backend, ModelRoles::default());
        assert_eq!(rewriter.rewrite("hello\n").await.unwrap(), "Hello.\n");
    }

    #[tokio::test]
    async fn test_empty_rewrite_is_an_error() {
        let backend = MockGenerationBackend::new().with_fixed_response("  \n");
        let rewriter = EnhancementRewriter::new(backend, ModelRoles::default());
        let err = rewriter.rewrite("hello").await.unwrap_err();
        assert!(matches!(err, Error::RewriteService(_)));
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_rewrite_error() {
        let backend = MockGenerationBackend::new().with_failure_rate(1.0);
        let rewriter = EnhancementRewriter::new(backend, ModelRoles::default());
        let err = rewriter.rewrite("hello").await.unwrap_err();
        assert!(matches!(err, Error::RewriteService(_)));
        assert!(err.is_upstream());
    }
}
