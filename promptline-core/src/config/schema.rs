//! Configuration schema structures with serde support

use super::error::{ValidationError, ValidationErrorKind};
use super::secrets::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptlineConfig {
    /// The model endpoint to talk to
    pub model: ModelConfig,

    /// HTTP connection settings
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Tool-calling agent settings
    #[serde(default)]
    pub agent: AgentSettings,

    /// Conversation memory settings
    #[serde(default)]
    pub session: SessionSettings,
}

/// Language model endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Provider type (openai, google, custom)
    #[serde(default)]
    pub provider: ProviderType,

    /// Model identifier (e.g. "gemini-2.0-flash", "gpt-4o-mini")
    pub model: String,

    /// API key (supports environment variable interpolation)
    pub api_key: SecretString,

    /// Override for the provider's base URL; required for `custom`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum output tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
}

/// Supported provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    /// Gemini through its OpenAI-compatible endpoint
    #[default]
    #[serde(alias = "google_genai", alias = "gemini")]
    Google,
    /// Any other OpenAI-compatible server
    Custom,
}

impl ProviderType {
    /// Parse the value of `LLM_PROVIDER`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAI),
            "google" | "google_genai" | "gemini" => Some(Self::Google),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    /// Lower-case identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Google => "google",
            Self::Custom => "custom",
        }
    }
}

/// Connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Maximum idle connections per host
    #[serde(default = "default_max_idle")]
    pub max_idle_per_host: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout(),
            request_timeout_ms: default_request_timeout(),
            max_idle_per_host: default_max_idle(),
        }
    }
}

impl ConnectionConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Tool-calling agent settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSettings {
    /// How many tool-call rounds a single exchange may perform.
    /// `0` disables tool use entirely.
    #[serde(default = "default_max_tool_hops")]
    pub max_tool_hops: u32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_tool_hops: default_max_tool_hops(),
        }
    }
}

/// Conversation memory settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSettings {
    /// Keep only this many of the most recent history messages when
    /// building a request. `None` resends the full transcript.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_history_messages: Option<usize>,
}

// Default value functions for serde
fn default_temperature() -> f32 { 0.0 }
fn default_connect_timeout() -> u64 { 10_000 }
fn default_request_timeout() -> u64 { 60_000 }
fn default_max_idle() -> usize { 10 }
fn default_max_tool_hops() -> u32 { 1 }

impl ModelConfig {
    /// Create a model configuration with defaults for everything optional
    pub fn new(
        provider: ProviderType,
        model: impl Into<String>,
        api_key: impl Into<SecretString>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key: api_key.into(),
            base_url: None,
            temperature: default_temperature(),
            max_tokens: None,
        }
    }

    /// Set the base URL override
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Validate the model section
    pub fn validate(&self, field_path: &str) -> Result<(), ValidationError> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::required(format!("{field_path}.model")));
        }

        if self.api_key.is_empty() {
            return Err(ValidationError::required(format!("{field_path}.api_key")));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::out_of_range(
                format!("{field_path}.temperature"),
                format!("temperature must be between 0.0 and 2.0, got {}", self.temperature),
            ));
        }

        if self.provider == ProviderType::Custom && self.base_url.is_none() {
            return Err(ValidationError::required(format!("{field_path}.base_url"))
                .with_context("custom providers need an explicit base URL"));
        }

        if let Some(base_url) = &self.base_url {
            if let Err(e) = url::Url::parse(base_url) {
                return Err(ValidationError::new(
                    format!("{field_path}.base_url"),
                    ValidationErrorKind::InvalidUrl {
                        message: e.to_string(),
                    },
                ));
            }
        }

        Ok(())
    }
}

impl PromptlineConfig {
    /// Wrap a model configuration with default connection, agent and session settings
    pub fn new(model: ModelConfig) -> Self {
        Self {
            model,
            connection: ConnectionConfig::default(),
            agent: AgentSettings::default(),
            session: SessionSettings::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.model.validate("model")?;

        if self.connection.request_timeout_ms == 0 {
            return Err(ValidationError::out_of_range(
                "connection.request_timeout_ms",
                "timeout must be positive",
            ));
        }

        if self.connection.connect_timeout_ms == 0 {
            return Err(ValidationError::out_of_range(
                "connection.connect_timeout_ms",
                "timeout must be positive",
            ));
        }

        if self.session.max_history_messages == Some(0) {
            return Err(ValidationError::out_of_range(
                "session.max_history_messages",
                "history window must keep at least one message",
            ));
        }

        Ok(())
    }
}
