//! OpenAI provider implementation
//!
//! Implements the Provider trait for OpenAI's API and for any other server
//! exposing an OpenAI-compatible `/chat/completions` endpoint.

pub mod converter;
pub mod types;

pub use types::{OpenAIRequest, OpenAIResponse};

use crate::providers::adapter::{Provider, ProviderCapabilities};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI provider implementation
pub struct OpenAIProvider {
    name: String,
    base_url: String,
    capabilities: ProviderCapabilities,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    pub fn new() -> Self {
        Self {
            name: "openai".to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
            capabilities: ProviderCapabilities {
                supports_functions: true,
                supports_json_mode: true,
                supports_seed: true,
            },
        }
    }

    /// An OpenAI-compatible server with unknown extras
    pub fn compatible(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            capabilities: ProviderCapabilities::default(),
        }
    }

    /// Point the provider at a different base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Provider for OpenAIProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for OpenAIProvider {
    fn default() -> Self {
        Self::new()
    }
}
