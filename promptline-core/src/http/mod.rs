//! HTTP client module for making API requests to LLM providers
//!
//! This module implements the HTTP layer, handling:
//! - Connection pooling and client management
//! - Request/response transformation through the provider adapter
//! - Error mapping from status codes
//! - Request ID generation and correlation

pub mod client;
pub mod error;

use crate::config::SecretString;
use crate::protocol::{ChatRequest, ChatResponse};
use crate::providers::{Provider, ProviderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

pub use client::HttpClient;

/// Type of API call being made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallKind {
    /// Chat completion request
    Chat,
}

impl CallKind {
    /// Get the endpoint path for this call kind
    pub fn endpoint(&self) -> &'static str {
        match self {
            CallKind::Chat => "/chat/completions",
        }
    }
}

/// Options for an HTTP request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Type of API call
    pub call_kind: CallKind,

    /// Unique request ID for correlation
    pub request_id: Uuid,

    /// Request timeout
    pub timeout: Duration,

    /// Optional context ID (e.g. a session id) for correlation across requests
    pub context_id: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            call_kind: CallKind::Chat,
            request_id: Uuid::new_v4(),
            timeout: Duration::from_secs(60),
            context_id: None,
        }
    }
}

impl RequestOptions {
    /// Create new request options with a generated request ID
    pub fn new(call_kind: CallKind) -> Self {
        Self {
            call_kind,
            request_id: Uuid::new_v4(),
            ..Default::default()
        }
    }

    /// Set the timeout for this request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a context ID for correlation
    pub fn with_context_id(mut self, id: impl Into<String>) -> Self {
        self.context_id = Some(id.into());
        self
    }
}

/// Trait for HTTP executors
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    /// Execute a non-streaming JSON request
    async fn execute_json(
        &self,
        provider: &dyn Provider,
        api_key: &SecretString,
        request: ChatRequest,
        options: RequestOptions,
    ) -> Result<ChatResponse, ProviderError>;
}
