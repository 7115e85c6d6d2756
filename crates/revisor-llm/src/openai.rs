//! Chat-completions gateway implementation
//!
//! Talks to an OpenAI-compatible chat-completions endpoint. Temperature,
//! output-token budget and timeout are constructor parameters, not hidden
//! constants, because the capability is rate- and cost-bounded by whoever
//! operates it. This gateway never retries: failures surface to the caller
//! as typed errors.

use crate::GatewayError;
use revisor_domain::traits::TextGenerator;
use revisor_domain::Generation;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default sampling temperature (low randomness for comparison work).
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Default output-token budget per generation.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1000;

/// Default request timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Gateway over an OpenAI-compatible chat-completions API.
pub struct OpenAiGateway {
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    client: reqwest::Client,
}

/// Request body for the chat-completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from the chat-completions API.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

impl OpenAiGateway {
    /// Create a gateway against an API base URL (e.g.
    /// `https://api.openai.com/v1`) with default sampling parameters.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            client,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output-token budget per generation.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder().timeout(timeout).build().unwrap();
        self
    }

    async fn call(&self, system: &str, user: &str) -> Result<Generation, GatewayError> {
        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_output_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Communication(format!("request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GatewayError::RateLimited);
        }
        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GatewayError::Communication(format!(
                "HTTP {}: {}",
                status, text
            )));
        }

        let decoded: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("decode failed: {}", e)))?;

        let text = decoded
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(GatewayError::EmptyResponse)?;

        Ok(Generation {
            text,
            tokens_used: decoded.usage.map(|u| u.total_tokens).unwrap_or(0),
        })
    }
}

impl TextGenerator for OpenAiGateway {
    type Error = GatewayError;

    async fn generate(&self, system: &str, user: &str) -> Result<Generation, GatewayError> {
        self.call(system, user).await
    }
}
