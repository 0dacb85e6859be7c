//! Core traits for notewise abstractions.
//!
//! These traits define the seams to external AI providers, so the
//! enhancement orchestrator and the AI features can run against a real
//! backend or a test double.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

// =============================================================================
// GENERATION
// =============================================================================

/// Per-call knobs for a generation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    /// Sampling temperature; backend default when `None`.
    pub temperature: Option<f32>,
    /// Ask the provider for a JSON object response.
    pub json: bool,
    /// Model override; backend default when `None`.
    pub model: Option<String>,
}

impl GenerationOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate a completion for `prompt`, optionally under a system prompt.
    async fn generate_with_options(
        &self,
        system: Option<&str>,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String>;

    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_options(None, prompt, &GenerationOptions::default())
            .await
    }

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.generate_with_options(Some(system), prompt, &GenerationOptions::default())
            .await
    }

    /// Generate a JSON object response with system context.
    async fn generate_json_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.generate_with_options(Some(system), prompt, &GenerationOptions::default().json())
            .await
    }

    /// Get the default model name being used.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: GenerationBackend + ?Sized> GenerationBackend for Arc<T> {
    async fn generate_with_options(
        &self,
        system: Option<&str>,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String> {
        (**self).generate_with_options(system, prompt, options).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

// =============================================================================
// REWRITE
// =============================================================================

/// External collaborator that grammatically improves plain text.
///
/// Implementations are expected to preserve the line count of the input.
/// Any failure (transport, timeout, unusable output) is reported as an
/// error; the caller never receives a partial rewrite.
#[async_trait]
pub trait RewriteService: Send + Sync {
    async fn rewrite(&self, text: &str) -> Result<String>;
}

#[async_trait]
impl<T: RewriteService + ?Sized> RewriteService for Arc<T> {
    async fn rewrite(&self, text: &str) -> Result<String> {
        (**self).rewrite(text).await
    }
}
