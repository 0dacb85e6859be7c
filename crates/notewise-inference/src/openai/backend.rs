//! OpenAI-compatible generation backend implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, trace, warn};

use notewise_core::{defaults, Error, GenerationBackend, GenerationOptions, Result};

use super::error::{to_core_error, OpenAIErrorCode};
use super::types::*;

/// Default OpenAI API endpoint.
pub const DEFAULT_OPENAI_URL: &str = defaults::OPENAI_URL;

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = defaults::GEN_MODEL;

/// Default timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = defaults::GEN_TIMEOUT_SECS;

/// Configuration for the OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication (optional for local endpoints).
    pub api_key: Option<String>,
    /// Model used when a call does not name one.
    pub gen_model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Skip TLS verification (for self-signed certs in local environments).
    pub skip_tls_verify: bool,
    /// HTTP-Referer header for OpenRouter.ai rankings (optional).
    pub http_referer: Option<String>,
    /// X-Title header for app name on OpenRouter.ai (optional).
    pub x_title: Option<String>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: None,
            gen_model: DEFAULT_GEN_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            skip_tls_verify: false,
            http_referer: None,
            x_title: None,
        }
    }
}

impl OpenAIConfig {
    /// Read the configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string()),
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            gen_model: std::env::var("AI_DEFAULT_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEN_MODEL.to_string()),
            timeout_seconds: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            skip_tls_verify: std::env::var("OPENAI_SKIP_TLS_VERIFY")
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(false),
            http_referer: std::env::var("OPENAI_HTTP_REFERER").ok(),
            x_title: std::env::var("OPENAI_X_TITLE").ok(),
        }
    }
}

/// OpenAI-compatible generation backend.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    /// Create a new OpenAI backend with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let mut client_builder =
            Client::builder().timeout(Duration::from_secs(config.timeout_seconds));

        if config.skip_tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "openai",
            model = %config.gen_model,
            timeout_secs = config.timeout_seconds,
            "Initializing OpenAI backend: url={}",
            config.base_url
        );

        Ok(Self { client, config })
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(OpenAIConfig::default())
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAIConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Build a request with authentication if configured.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        // OpenRouter-specific headers
        if let Some(ref referer) = self.config.http_referer {
            req = req.header("HTTP-Referer", referer);
        }

        if let Some(ref title) = self.config.x_title {
            req = req.header("X-Title", title);
        }

        req.header("Content-Type", "application/json")
    }

    fn build_chat_request(
        &self,
        system: Option<&str>,
        prompt: &str,
        options: &GenerationOptions,
    ) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system.filter(|s| !s.is_empty()) {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        ChatCompletionRequest {
            model: options
                .model
                .clone()
                .unwrap_or_else(|| self.config.gen_model.clone()),
            messages,
            temperature: options.temperature,
            response_format: options.json.then(ResponseFormat::json_object),
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    #[instrument(
        skip(self, system, prompt, options),
        fields(
            subsystem = "inference",
            component = "openai",
            op = "generate",
            model = %options.model.as_deref().unwrap_or(&self.config.gen_model),
            json_mode = options.json,
            prompt_len = prompt.len(),
        )
    )]
    async fn generate_with_options(
        &self,
        system: Option<&str>,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String> {
        let start = Instant::now();
        let request = self.build_chat_request(system, prompt, options);

        let response = self
            .build_request("/chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Inference(format!(
                        "Request timed out after {}s",
                        self.config.timeout_seconds
                    ))
                } else {
                    Error::Inference(format!("Request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body: OpenAIErrorResponse = response
                .json()
                .await
                .unwrap_or_else(|_| OpenAIErrorResponse::unknown());
            let code = OpenAIErrorCode::from_response(status.as_u16(), &body.error.error_type);
            warn!(
                status = status.as_u16(),
                retryable = code.is_retryable(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Chat completion rejected: {}",
                body.error.message
            );
            return Err(to_core_error(
                code,
                &format!("OpenAI returned {}: {}", status, body.error.message),
            ));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let choice = result
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Inference("Response contained no choices".to_string()))?;
        let content = choice.message.content.unwrap_or_default();

        trace!(response = %content, "Raw model response");
        debug!(
            response_len = content.len(),
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            duration_ms = start.elapsed().as_millis() as u64,
            "Generation complete"
        );
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }
}
