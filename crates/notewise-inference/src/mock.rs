//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notewise_core::GenerationBackend;
//! use notewise_inference::mock::MockGenerationBackend;
//!
//! #[tokio::test]
//! async fn test_with_mock_backend() {
//!     let backend = MockGenerationBackend::new()
//!         .with_fixed_response("Test response")
//!         .with_response_mapping("ping", "pong");
//!
//!     assert_eq!(backend.generate("ping").await.unwrap(), "pong");
//!     assert_eq!(backend.call_count(), 1);
//! }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;

use notewise_core::{Error, GenerationBackend, GenerationOptions, Result};

/// Mock generation backend for testing.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    model_name: String,
    fixed_responses: HashMap<String, String>,
    default_response: String,
    latency_ms: u64,
    failure_rate: f64,
}

/// One recorded generation call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: Option<String>,
    pub prompt: String,
    pub options: GenerationOptions,
    pub timestamp: Instant,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            model_name: "mock-model".to_string(),
            fixed_responses: HashMap::new(),
            default_response: "Mock response".to_string(),
            latency_ms: 0,
            failure_rate: 0.0,
        }
    }
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the response returned for unmapped prompts.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Add a response for one specific user prompt.
    pub fn with_response_mapping(
        mut self,
        prompt: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .fixed_responses
            .insert(prompt.into(), response.into());
        self
    }

    /// Set the reported model name.
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).model_name = name.into();
        self
    }

    /// Set simulated latency for all calls.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Set failure rate (0.0 - 1.0) for testing error handling.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        Arc::make_mut(&mut self.config).failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    /// Number of generation calls so far.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().map(|log| log.len()).unwrap_or(0)
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        if let Ok(mut log) = self.call_log.lock() {
            log.clear();
        }
    }

    fn log_call(&self, system: Option<&str>, prompt: &str, options: &GenerationOptions) {
        if let Ok(mut log) = self.call_log.lock() {
            log.push(MockCall {
                system: system.map(str::to_string),
                prompt: prompt.to_string(),
                options: options.clone(),
                timestamp: Instant::now(),
            });
        }
    }

    fn should_fail(&self) -> bool {
        use rand::Rng;
        if self.config.failure_rate > 0.0 {
            rand::thread_rng().gen::<f64>() < self.config.failure_rate
        } else {
            false
        }
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate_with_options(
        &self,
        system: Option<&str>,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String> {
        self.log_call(system, prompt, options);
        self.simulate_latency().await;

        if self.should_fail() {
            return Err(Error::Inference("Simulated failure".to_string()));
        }

        if let Some(response) = self.config.fixed_responses.get(prompt) {
            return Ok(response.clone());
        }

        Ok(self.config.default_response.clone())
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_response() {
        let backend = MockGenerationBackend::new();
        assert_eq!(backend.generate("anything").await.unwrap(), "Mock response");
        assert_eq!(backend.model_name(), "mock-model");
    }

    #[tokio::test]
    async fn test_mock_response_mapping() {
        let backend = MockGenerationBackend::new()
            .with_fixed_response("fallback")
            .with_response_mapping("hello", "world");

        assert_eq!(backend.generate("hello").await.unwrap(), "world");
        assert_eq!(backend.generate("bye").await.unwrap(), "fallback");
    }

    #[tokio::test]
    async fn test_mock_call_logging() {
        let backend = MockGenerationBackend::new();
        backend
            .generate_with_options(
                Some("sys"),
                "prompt",
                &GenerationOptions::default().with_temperature(0.1),
            )
            .await
            .unwrap();
        backend.generate("second").await.unwrap();

        let calls = backend.get_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].system.as_deref(), Some("sys"));
        assert_eq!(calls[0].options.temperature, Some(0.1));
        assert_eq!(calls[1].prompt, "second");

        backend.clear_calls();
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_clones_share_log() {
        let backend = MockGenerationBackend::new();
        let clone = backend.clone();
        clone.generate("x").await.unwrap();
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_failure_rate() {
        let always = MockGenerationBackend::new().with_failure_rate(1.0);
        assert!(matches!(always.generate("x").await, Err(Error::Inference(_))));

        let never = MockGenerationBackend::new().with_failure_rate(0.0);
        assert!(never.generate("x").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_latency() {
        let backend = MockGenerationBackend::new().with_latency_ms(50);
        let start = tokio::time::Instant::now();
        backend.generate("x").await.unwrap();
        assert!(start.elapsed() >= tokio::time::Duration::from_millis(50));
    }
}
