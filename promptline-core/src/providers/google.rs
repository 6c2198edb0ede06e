//! Google Gemini provider
//!
//! Talks to Gemini through its OpenAI-compatible endpoint. Gemini does not
//! always populate tool call ids, so the adapter assigns one whenever the
//! id is missing so tool results can still be correlated.

use crate::protocol::{ChatRequest, ChatResponse};
use crate::providers::adapter::{Provider, ProviderCapabilities};
use crate::providers::openai::converter::{from_openai_response, to_openai_request};
use crate::providers::openai::types::{OpenAIRequest, OpenAIResponse};
use uuid::Uuid;

const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Gemini provider implementation
pub struct GoogleProvider {
    base_url: String,
    capabilities: ProviderCapabilities,
}

impl GoogleProvider {
    /// Create a new Gemini provider
    pub fn new() -> Self {
        Self {
            base_url: GOOGLE_BASE_URL.to_string(),
            capabilities: ProviderCapabilities {
                supports_functions: true,
                supports_json_mode: true,
                supports_seed: false,
            },
        }
    }

    /// Point the provider at a different base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Provider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    fn transform_request(&self, request: &ChatRequest) -> OpenAIRequest {
        let mut wire = to_openai_request(request);
        if !self.capabilities.supports_seed && wire.seed.take().is_some() {
            tracing::debug!("dropping unsupported seed parameter for google");
        }
        wire
    }

    fn transform_response(&self, response: OpenAIResponse) -> ChatResponse {
        let mut response = from_openai_response(response);
        for choice in &mut response.choices {
            for call in choice.message.tool_calls.iter_mut().flatten() {
                if call.id.is_empty() {
                    call.id = format!("call_{}", Uuid::new_v4().simple());
                }
            }
        }
        response
    }

    fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for GoogleProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_tool_call_ids_are_filled() {
        let wire: OpenAIResponse = serde_json::from_value(json!({
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "type": "function",
                        "function": {"name": "search_wikipedia", "arguments": "{\"query\":\"Einstein\"}"}
                    }]
                }
            }]
        }))
        .unwrap();

        let response = GoogleProvider::new().transform_response(wire);
        let calls = response.first_message().unwrap().tool_calls.clone().unwrap();
        assert!(calls[0].id.starts_with("call_"));
        assert_eq!(calls[0].name(), "search_wikipedia");
    }

    #[test]
    fn test_seed_is_dropped() {
        let mut request = ChatRequest::new("gemini-2.0-flash", vec![]);
        request.seed = Some(42);
        let wire = GoogleProvider::new().transform_request(&request);
        assert!(wire.seed.is_none());
    }
}
