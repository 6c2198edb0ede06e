//! HTTP client implementation using reqwest

use crate::config::{ConnectionConfig, SecretString};
use crate::http::{HttpExecutor, RequestOptions};
use crate::protocol::{ChatRequest, ChatResponse};
use crate::providers::openai::types::OpenAIResponse;
use crate::providers::{Provider, ProviderError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Maximum response size
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Default user agent
const USER_AGENT: &str = concat!("promptline/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with connection pooling
#[derive(Clone)]
pub struct HttpClient {
    /// The underlying reqwest client
    client: Arc<Client>,

    /// Maximum response size to prevent OOM
    max_response_size: usize,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, ProviderError> {
        Self::from_config(&ConnectionConfig::default())
    }

    /// Create a new HTTP client from connection settings
    pub fn from_config(config: &ConnectionConfig) -> Result<Self, ProviderError> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(config.max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| ProviderError::Custom {
                code: "CLIENT_INIT".to_string(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self::from_reqwest(client))
    }

    /// Wrap an already configured reqwest client
    pub fn from_reqwest(client: Client) -> Self {
        Self {
            client: Arc::new(client),
            max_response_size: MAX_RESPONSE_SIZE,
        }
    }

    /// The underlying reqwest client, shared with tools that make their own calls
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Build the full URL for a provider and call kind
    fn build_url(&self, provider: &dyn Provider, options: &RequestOptions) -> String {
        format!("{}{}", provider.base_url(), provider.endpoint(options.call_kind))
    }

    /// Validate response content type
    fn validate_content_type(response: &Response) -> Result<(), ProviderError> {
        if let Some(content_type) = response.headers().get("content-type") {
            let content_type_str = content_type.to_str().unwrap_or("").to_lowercase();

            if !content_type_str.contains("application/json") {
                return Err(ProviderError::ParseError {
                    message: format!("Expected application/json, got: {}", content_type_str),
                });
            }
        }

        Ok(())
    }

    /// Check response size to prevent OOM
    fn check_content_length(&self, response: &Response) -> Result<(), ProviderError> {
        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_response_size {
                return Err(ProviderError::Custom {
                    code: "RESPONSE_TOO_LARGE".to_string(),
                    message: format!(
                        "Response size {} exceeds maximum {}",
                        content_length, self.max_response_size
                    ),
                });
            }
        }

        Ok(())
    }
}

#[async_trait]
impl HttpExecutor for HttpClient {
    async fn execute_json(
        &self,
        provider: &dyn Provider,
        api_key: &SecretString,
        request: ChatRequest,
        options: RequestOptions,
    ) -> Result<ChatResponse, ProviderError> {
        let request_id = options.request_id;

        info!(
            provider = provider.name(),
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            %request_id,
            "sending chat request"
        );

        let url = self.build_url(provider, &options);
        debug!(%url, %request_id, "request url");

        let wire_request = provider.transform_request(&request);

        let mut req_builder = self
            .client
            .post(&url)
            .timeout(options.timeout)
            .json(&wire_request);

        for (key, value) in provider.headers(api_key.expose_secret()) {
            req_builder = req_builder.header(key, value);
        }

        // Add request ID header for correlation
        req_builder = req_builder.header("X-Request-ID", request_id.to_string());

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                warn!(provider = provider.name(), %request_id, "request timeout");
                ProviderError::Timeout
            } else if e.is_connect() {
                error!(provider = provider.name(), %request_id, error = %e, "connection error");
                ProviderError::NetworkError {
                    message: format!("Connection failed: {} [request_id: {}]", e, request_id),
                }
            } else {
                error!(provider = provider.name(), %request_id, error = %e, "request error");
                ProviderError::NetworkError {
                    message: format!("{} [request_id: {}]", e, request_id),
                }
            }
        })?;

        let status = response.status();
        debug!(%status, %request_id, "response status");

        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.ok();

            warn!(%status, provider = provider.name(), %request_id, "request failed");

            return Err(super::error::map_http_error(
                status,
                Some(&headers),
                body,
                request_id,
            ));
        }

        Self::validate_content_type(&response)?;
        self.check_content_length(&response)?;

        let response_text = response.text().await.map_err(|e| ProviderError::NetworkError {
            message: format!("Failed to read response body: {} [request_id: {}]", e, request_id),
        })?;

        if response_text.len() > self.max_response_size {
            return Err(ProviderError::Custom {
                code: "RESPONSE_TOO_LARGE".to_string(),
                message: format!(
                    "Response size {} exceeds maximum {} [request_id: {}]",
                    response_text.len(),
                    self.max_response_size,
                    request_id
                ),
            });
        }

        let wire_response: OpenAIResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(provider = provider.name(), %request_id, error = %e, "failed to parse response");
                ProviderError::ParseError {
                    message: format!("Invalid response format: {} [request_id: {}]", e, request_id),
                }
            })?;

        let canonical_response = provider.transform_response(wire_response);

        if let Some(usage) = &canonical_response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                %request_id,
                "token usage"
            );
        }
        info!(provider = provider.name(), %request_id, "request completed");

        Ok(canonical_response)
    }
}
