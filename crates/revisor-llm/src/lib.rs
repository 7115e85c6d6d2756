//! Revisor Gateway Layer
//!
//! Implementations of the [`TextGenerator`] trait from `revisor-domain`.
//!
//! # Providers
//!
//! - [`MockGateway`]: deterministic test double, no network
//! - [`OpenAiGateway`]: chat-completions API over HTTP
//!
//! # Examples
//!
//! ```
//! use revisor_llm::MockGateway;
//! use revisor_domain::traits::TextGenerator;
//!
//! # tokio_test::block_on(async {
//! let gateway = MockGateway::new(r#"{"erros": []}"#);
//! let generation = gateway.generate("system text", "user text").await.unwrap();
//! assert_eq!(generation.text, r#"{"erros": []}"#);
//! # });
//! ```

#![warn(missing_docs)]

pub mod openai;

use revisor_domain::traits::TextGenerator;
use revisor_domain::Generation;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use openai::OpenAiGateway;

/// Errors that can occur while talking to the generation capability.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Network or API communication error
    #[error("communication error: {0}")]
    Communication(String),

    /// Response arrived but could not be decoded
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Response carried no usable text
    #[error("generation returned no usable text")]
    EmptyResponse,

    /// The capability refused the request for rate/cost reasons
    #[error("rate limit exceeded")]
    RateLimited,

    /// Generic error
    #[error("gateway error: {0}")]
    Other(String),
}

/// Deterministic gateway double for tests.
///
/// Returns pre-configured responses keyed by the user role text, without any
/// network calls. Shares state through `Arc` so clones observe the same call
/// count, useful for asserting how often a pipeline reached the gateway.
#[derive(Debug, Clone)]
pub struct MockGateway {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
}

/// Marker stored in the response table to trigger an injected failure.
const ERROR_MARKER: &str = "\u{0}ERROR";

impl MockGateway {
    /// Create a gateway that answers every prompt with a fixed text.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Register a specific response for a given user prompt.
    pub fn add_response(&mut self, user_prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(user_prompt.into(), response.into());
    }

    /// Make a given user prompt fail with a gateway error.
    pub fn add_error(&mut self, user_prompt: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(user_prompt.into(), ERROR_MARKER.to_string());
    }

    /// How many times `generate` has been called.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new(r#"{"erros": []}"#)
    }
}

impl TextGenerator for MockGateway {
    type Error = GatewayError;

    async fn generate(&self, _system: &str, user: &str) -> Result<Generation, GatewayError> {
        *self.call_count.lock().unwrap() += 1;

        let responses = self.responses.lock().unwrap();
        let text = match responses.get(user) {
            Some(r) if r == ERROR_MARKER => {
                return Err(GatewayError::Other("mock error".to_string()))
            }
            Some(r) => r.clone(),
            None => self.default_response.clone(),
        };

        Ok(Generation {
            text,
            tokens_used: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_response() {
        let gateway = MockGateway::new("fixed");
        let generation = gateway.generate("sys", "anything").await.unwrap();
        assert_eq!(generation.text, "fixed");
    }

    #[tokio::test]
    async fn test_mock_specific_responses() {
        let mut gateway = MockGateway::new("default");
        gateway.add_response("prompt a", "answer a");
        gateway.add_response("prompt b", "answer b");

        assert_eq!(gateway.generate("s", "prompt a").await.unwrap().text, "answer a");
        assert_eq!(gateway.generate("s", "prompt b").await.unwrap().text, "answer b");
        assert_eq!(gateway.generate("s", "unknown").await.unwrap().text, "default");
    }

    #[tokio::test]
    async fn test_mock_call_count_shared_across_clones() {
        let gateway = MockGateway::new("x");
        let clone = gateway.clone();

        gateway.generate("s", "1").await.unwrap();
        clone.generate("s", "2").await.unwrap();

        assert_eq!(gateway.call_count(), 2);
        assert_eq!(clone.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_error_injection() {
        let mut gateway = MockGateway::default();
        gateway.add_error("bad prompt");

        let result = gateway.generate("s", "bad prompt").await;
        assert!(matches!(result, Err(GatewayError::Other(_))));
    }
}
