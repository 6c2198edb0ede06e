//! Provider abstraction
//!
//! This module maps the canonical protocol onto concrete LLM providers and
//! defines the errors the endpoint can produce.

pub mod adapter;
pub mod error;
pub mod google;
pub mod openai;

pub use adapter::{create_provider, Provider, ProviderCapabilities};
pub use error::{ProviderError, ProviderResult};

// Re-export concrete providers
pub use google::GoogleProvider;
pub use openai::OpenAIProvider;
