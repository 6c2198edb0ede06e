//! Language model endpoint
//!
//! [`ChatModel`] is the seam every responder talks through: role-tagged
//! messages plus optional tool declarations in, a completion or tool
//! request out. [`RemoteChatModel`] implements it over HTTP;
//! [`ScriptedChatModel`] is a deterministic stand-in for tests and demos.

use crate::config::{ModelConfig, PromptlineConfig};
use crate::http::{CallKind, HttpClient, HttpExecutor, RequestOptions};
use crate::protocol::{
    ChatRequest, CompletionUsage, Message, MessageRole, ResponseFormat, ToolCall, ToolDefinition,
};
use crate::providers::{create_provider, Provider, ProviderError, ProviderResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// What the endpoint answered for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReply {
    /// The assistant message, possibly carrying tool calls
    pub message: Message,
    /// Token usage, when the provider reports it
    pub usage: Option<CompletionUsage>,
    /// Provider finish reason
    pub finish_reason: Option<String>,
}

impl ModelReply {
    /// A plain text completion
    pub fn text_reply(content: impl Into<String>) -> Self {
        Self {
            message: Message::assistant(content),
            usage: None,
            finish_reason: Some("stop".to_string()),
        }
    }

    /// A completion requesting tool invocations
    pub fn tool_call_reply(calls: Vec<ToolCall>) -> Self {
        Self {
            message: crate::protocol::MessageBuilder::new(MessageRole::Assistant, "")
                .with_tool_calls(calls)
                .build(),
            usage: None,
            finish_reason: Some("tool_calls".to_string()),
        }
    }

    /// Completion text
    pub fn text(&self) -> &str {
        &self.message.content
    }

    /// Tool calls requested by the model, empty when there are none
    pub fn tool_calls(&self) -> &[ToolCall] {
        self.message.tool_calls.as_deref().unwrap_or(&[])
    }
}

/// The language model endpoint
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send a conversation, optionally declaring tools the model may call
    async fn invoke(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> ProviderResult<ModelReply>;
}

/// A chat model reached over HTTP through a provider adapter
pub struct RemoteChatModel {
    provider: Box<dyn Provider>,
    executor: Arc<dyn HttpExecutor>,
    config: ModelConfig,
    timeout: Duration,
    response_format: Option<ResponseFormat>,
}

impl RemoteChatModel {
    /// Create a model bound to a provider configuration and an executor
    pub fn new(config: ModelConfig, executor: Arc<dyn HttpExecutor>) -> Self {
        Self {
            provider: create_provider(&config),
            executor,
            config,
            timeout: Duration::from_secs(60),
            response_format: None,
        }
    }

    /// Build the model and its HTTP client from a full configuration
    pub fn from_config(config: &PromptlineConfig) -> ProviderResult<Self> {
        let client = HttpClient::from_config(&config.connection)?;
        Ok(Self::new(config.model.clone(), Arc::new(client))
            .with_timeout(config.connection.request_timeout()))
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Ask for JSON-only output when the provider supports it
    pub fn with_json_mode(mut self) -> Self {
        if self.provider.capabilities().supports_json_mode {
            self.response_format = Some(ResponseFormat::JsonObject);
        } else {
            debug!(provider = self.provider.name(), "JSON mode not supported, relying on prompt");
        }
        self
    }

    /// Name of the provider adapter in use
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Model identifier
    pub fn model_id(&self) -> &str {
        &self.config.model
    }

    fn build_request(&self, messages: &[Message], tools: Option<&[ToolDefinition]>) -> ChatRequest {
        let mut request = ChatRequest::new(self.config.model.clone(), messages.to_vec())
            .with_temperature(self.config.temperature)
            .with_tools(tools.unwrap_or(&[]));
        if let Some(max_tokens) = self.config.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(format) = &self.response_format {
            request = request.with_response_format(format.clone());
        }
        request
    }
}

#[async_trait]
impl ChatModel for RemoteChatModel {
    async fn invoke(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> ProviderResult<ModelReply> {
        if tools.is_some_and(|t| !t.is_empty()) && !self.provider.capabilities().supports_functions {
            return Err(ProviderError::InvalidRequest {
                message: format!("provider '{}' does not support tool calling", self.provider.name()),
            });
        }

        let request = self.build_request(messages, tools);
        let options = RequestOptions::new(CallKind::Chat).with_timeout(self.timeout);

        let response = self
            .executor
            .execute_json(self.provider.as_ref(), &self.config.api_key, request, options)
            .await?;

        let usage = response.usage.clone();
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(ModelReply {
            message: choice.message,
            usage,
            finish_reason: choice.finish_reason,
        })
    }
}

type ReplyFn = dyn Fn(&[Message], Option<&[ToolDefinition]>) -> ProviderResult<ModelReply> + Send + Sync;

/// One recorded invocation of a [`ScriptedChatModel`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// The conversation as it was sent
    pub messages: Vec<Message>,
    /// Tool declarations, if any were sent
    pub tools: Option<Vec<ToolDefinition>>,
}

enum Script {
    Queue(Mutex<VecDeque<ProviderResult<ModelReply>>>),
    Function(Box<ReplyFn>),
}

/// Deterministic chat model that replays canned replies and records every call
pub struct ScriptedChatModel {
    script: Script,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedChatModel {
    /// Reply with each entry in order; fails once the script is exhausted
    pub fn new(replies: impl IntoIterator<Item = ProviderResult<ModelReply>>) -> Self {
        Self {
            script: Script::Queue(Mutex::new(replies.into_iter().collect())),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply with plain text completions in order
    pub fn with_texts<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self::new(texts.into_iter().map(|t| Ok(ModelReply::text_reply(t))))
    }

    /// Compute each reply from the conversation it receives
    pub fn from_fn<F>(reply: F) -> Self
    where
        F: Fn(&[Message], Option<&[ToolDefinition]>) -> ProviderResult<ModelReply>
            + Send
            + Sync
            + 'static,
    {
        Self {
            script: Script::Function(Box::new(reply)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every invocation seen so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Number of invocations seen so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn invoke(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> ProviderResult<ModelReply> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                messages: messages.to_vec(),
                tools: tools.map(<[ToolDefinition]>::to_vec),
            });
        }

        match &self.script {
            Script::Queue(queue) => queue
                .lock()
                .ok()
                .and_then(|mut queue| queue.pop_front())
                .unwrap_or_else(|| {
                    Err(ProviderError::Custom {
                        code: "SCRIPT_EXHAUSTED".to_string(),
                        message: "no scripted reply left".to_string(),
                    })
                }),
            Script::Function(reply) => reply(messages, tools),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderType;
    use serde_json::json;

    #[tokio::test]
    async fn test_scripted_model_replays_and_records() {
        let model = ScriptedChatModel::with_texts(["first", "second"]);
        let tools = vec![ToolDefinition::function("t", "d", json!({}))];

        let reply = model.invoke(&[Message::user("hi")], Some(&tools)).await.unwrap();
        assert_eq!(reply.text(), "first");
        let reply = model.invoke(&[Message::user("again")], None).await.unwrap();
        assert_eq!(reply.text(), "second");
        assert!(model.invoke(&[], None).await.is_err());

        let calls = model.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].tools.as_ref().map(Vec::len), Some(1));
        assert!(calls[1].tools.is_none());
    }

    #[test]
    fn test_build_request_applies_config() {
        let mut config = ModelConfig::new(ProviderType::OpenAI, "gpt-4o-mini", "sk-test")
            .with_temperature(0.9);
        config.max_tokens = Some(256);
        let model = RemoteChatModel::new(config, Arc::new(HttpClient::new().unwrap()))
            .with_json_mode();

        let request = model.build_request(&[Message::user("hi")], None);
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.temperature, Some(0.9));
        assert_eq!(request.max_tokens, Some(256));
        assert!(request.tools.is_none());
        assert_eq!(request.response_format, Some(ResponseFormat::JsonObject));
    }

    #[test]
    fn test_tool_call_reply_accessors() {
        let reply = ModelReply::tool_call_reply(vec![ToolCall::function(
            "call_9",
            "search_wikipedia",
            json!({"query": "Ada Lovelace"}),
        )]);
        assert_eq!(reply.text(), "");
        assert_eq!(reply.tool_calls().len(), 1);
        assert_eq!(reply.tool_calls()[0].id, "call_9");
    }
}
