//! Generative client abstraction.
//!
//! One operation covers every responder role: prompt in, strict JSON
//! out. Supports Ollama (`/api/generate` with format=json) and
//! OpenAI-compatible endpoints, plus a fake client for tests so the
//! engine never needs network access in CI.

use crate::config::LlmConfig;
use async_trait::async_trait;
use std::time::Duration;

/// Generative call errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("generative backend is disabled in configuration")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    #[error("backend returned an empty response")]
    Empty,
}

/// Generic generative client trait.
///
/// `schema_description` is appended to the prompt so small local
/// models reliably produce the expected object shape.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn call_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema_description: &str,
    ) -> Result<serde_json::Value, LlmError>;
}

/// HTTP client implementation
pub struct HttpGenerativeClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl HttpGenerativeClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Heuristic: 11434 or "ollama" in the endpoint means Ollama-style API
    fn is_ollama_endpoint(&self) -> bool {
        self.config.endpoint.contains("11434") || self.config.endpoint.contains("ollama")
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.config.timeout_secs)
        } else {
            LlmError::Http(format!("request failed: {}", e))
        }
    }

    /// Call Ollama-style API
    async fn call_ollama(&self, prompt: &str) -> Result<serde_json::Value, LlmError> {
        let url = format!("{}/api/generate", self.config.endpoint);

        let request_body = serde_json::json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
            "format": "json",
        });

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(LlmError::Http(format!("HTTP {} from Ollama", response.status())));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidJson(format!("failed to parse response: {}", e)))?;

        let text = response_json
            .get("response")
            .and_then(|v| v.as_str())
            .ok_or(LlmError::Empty)?;

        serde_json::from_str(text)
            .map_err(|e| LlmError::InvalidJson(format!("model output is not valid JSON: {}", e)))
    }

    /// Call OpenAI-compatible API
    async fn call_openai_compatible(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<serde_json::Value, LlmError> {
        let url = format!("{}/v1/chat/completions", self.config.endpoint);

        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
            "response_format": {"type": "json_object"},
        });

        let mut request = self.client.post(&url).json(&request_body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(LlmError::Http(format!(
                "HTTP {} from OpenAI-compatible API",
                response.status()
            )));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidJson(format!("failed to parse response: {}", e)))?;

        let text = response_json
            .get("choices")
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("message"))
            .and_then(|v| v.get("content"))
            .and_then(|v| v.as_str())
            .ok_or(LlmError::Empty)?;

        serde_json::from_str(text)
            .map_err(|e| LlmError::InvalidJson(format!("model output is not valid JSON: {}", e)))
    }
}

#[async_trait]
impl GenerativeClient for HttpGenerativeClient {
    async fn call_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema_description: &str,
    ) -> Result<serde_json::Value, LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }

        let full_prompt = format!(
            "{}\n\nUser message: {}\n\nYou must respond with valid JSON matching this schema:\n{}",
            system_prompt, user_prompt, schema_description
        );

        if self.is_ollama_endpoint() {
            match self.call_ollama(&full_prompt).await {
                Ok(json) => return Ok(json),
                Err(e) => {
                    tracing::debug!("Ollama API failed, trying OpenAI-compatible: {}", e);
                }
            }
        }

        self.call_openai_compatible(system_prompt, &full_prompt).await
    }
}

/// Fake generative client for tests: returns scripted responses in
/// order, repeating the last one once the script runs out.
pub struct FakeGenerativeClient {
    responses: std::sync::Mutex<Vec<Result<serde_json::Value, LlmError>>>,
    calls: std::sync::Mutex<Vec<String>>,
}

impl FakeGenerativeClient {
    pub fn new(responses: Vec<Result<serde_json::Value, LlmError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Always return the same JSON value
    pub fn always_valid(json: serde_json::Value) -> Self {
        Self::new(vec![Ok(json)])
    }

    /// Always return the same error
    pub fn always_error(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// User prompts seen, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeClient for FakeGenerativeClient {
    async fn call_json(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
        _schema_description: &str,
    ) -> Result<serde_json::Value, LlmError> {
        self.calls.lock().unwrap().push(user_prompt.to_string());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(LlmError::Empty);
        }

        if responses.len() == 1 {
            responses[0].clone()
        } else {
            responses.remove(0)
        }
    }
}
