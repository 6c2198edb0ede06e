//! Provider adapter trait and capabilities
//!
//! Defines the core abstraction for LLM providers. Every supported provider
//! speaks the OpenAI chat-completions wire format; adapters differ in base
//! URL, authentication headers and response quirks.

use super::openai::converter::{from_openai_response, to_openai_request};
use super::openai::types::{OpenAIRequest, OpenAIResponse};
use crate::config::{ModelConfig, ProviderType};
use crate::http::CallKind;
use crate::protocol::{ChatRequest, ChatResponse};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Core provider trait that all LLM providers must implement
pub trait Provider: Send + Sync {
    /// Get the provider's name
    fn name(&self) -> &str;

    /// Get the provider's capabilities
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Transform a request from canonical format to the wire format
    fn transform_request(&self, request: &ChatRequest) -> OpenAIRequest {
        to_openai_request(request)
    }

    /// Transform a wire response to canonical format
    fn transform_response(&self, response: OpenAIResponse) -> ChatResponse {
        from_openai_response(response)
    }

    /// Get the base URL for this provider
    fn base_url(&self) -> &str;

    /// Get the endpoint path for a specific call kind
    fn endpoint(&self, call_kind: CallKind) -> &str {
        call_kind.endpoint()
    }

    /// Get headers required for this provider; the JSON content type is
    /// set by the HTTP layer
    fn headers(&self, api_key: &str) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), format!("Bearer {}", api_key));
        headers
    }
}

/// Provider capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    /// Does the provider support function calling?
    pub supports_functions: bool,

    /// Does the provider support JSON mode?
    pub supports_json_mode: bool,

    /// Does the provider honour the `seed` parameter?
    pub supports_seed: bool,
}

impl Default for ProviderCapabilities {
    fn default() -> Self {
        Self {
            supports_functions: true,
            supports_json_mode: false,
            supports_seed: false,
        }
    }
}

/// Create the adapter for a model configuration
pub fn create_provider(config: &ModelConfig) -> Box<dyn Provider> {
    match config.provider {
        ProviderType::OpenAI => {
            let provider = super::OpenAIProvider::new();
            match &config.base_url {
                Some(base_url) => Box::new(provider.with_base_url(base_url.clone())),
                None => Box::new(provider),
            }
        }
        ProviderType::Google => {
            let provider = super::GoogleProvider::new();
            match &config.base_url {
                Some(base_url) => Box::new(provider.with_base_url(base_url.clone())),
                None => Box::new(provider),
            }
        }
        ProviderType::Custom => Box::new(super::OpenAIProvider::compatible(
            "custom",
            config.base_url.clone().unwrap_or_default(),
        )),
    }
}
