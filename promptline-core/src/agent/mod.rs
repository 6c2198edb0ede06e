//! Tool-augmented responder
//!
//! One exchange renders the prompt, asks the model (declaring the registered
//! tools), runs the first tool the model requests, feeds the result back and
//! asks again. The number of tool rounds is bounded by
//! [`AgentSettings::max_tool_hops`]; once it is spent the next invocation is
//! made without tool declarations and its text is the answer.

use crate::config::AgentSettings;
use crate::model::ChatModel;
use crate::prompt::{ChatPromptTemplate, PromptError, PromptValues};
use crate::protocol::{Message, MessageBuilder, MessageRole, ToolCall};
use crate::providers::ProviderError;
use crate::tools::{ToolError, ToolOutcome, ToolRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort an exchange
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model requested unknown tool '{name}'")]
    UnknownTool { name: String },

    #[error("invalid arguments for tool '{tool}': {message}")]
    InvalidToolArguments { tool: String, message: String },

    #[error("model endpoint failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("prompt rendering failed: {0}")]
    Prompt(#[from] PromptError),
}

impl From<ToolError> for AgentError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::InvalidArguments { tool, message } => {
                AgentError::InvalidToolArguments { tool, message }
            }
        }
    }
}

/// One tool run during an exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// The call as the model requested it
    pub call: ToolCall,
    /// What the tool produced
    pub outcome: ToolOutcome,
}

/// Everything that happened during one exchange
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    /// Final completion text
    pub answer: String,
    /// The full conversation, including tool-call and tool-result messages
    pub conversation: Vec<Message>,
    /// Tools run, in order
    pub tool_invocations: Vec<ToolInvocation>,
}

/// Answers user input, consulting registered tools when the model asks
pub struct ToolAugmentedResponder {
    model: Arc<dyn ChatModel>,
    tools: ToolRegistry,
    prompt: ChatPromptTemplate,
    settings: AgentSettings,
}

impl ToolAugmentedResponder {
    /// `prompt` is rendered with the user's text bound to `input`
    pub fn new(model: Arc<dyn ChatModel>, tools: ToolRegistry, prompt: ChatPromptTemplate) -> Self {
        Self {
            model,
            tools,
            prompt,
            settings: AgentSettings::default(),
        }
    }

    /// A fixed system instruction followed by the user's input
    pub fn with_system_instruction(
        model: Arc<dyn ChatModel>,
        tools: ToolRegistry,
        instruction: impl Into<String>,
    ) -> Self {
        Self::new(model, tools, ChatPromptTemplate::system_with_input(instruction))
    }

    pub fn with_settings(mut self, settings: AgentSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Answer `user_input`
    pub async fn respond(&self, user_input: &str) -> Result<String, AgentError> {
        Ok(self.respond_traced(user_input).await?.answer)
    }

    /// Answer `user_input`, keeping the conversation and tool runs
    pub async fn respond_traced(&self, user_input: &str) -> Result<Exchange, AgentError> {
        let mut conversation = self
            .prompt
            .format_messages(&PromptValues::new().set("input", user_input))?;
        let definitions = self.tools.definitions();
        let mut tool_invocations = Vec::new();
        let mut hops = 0;

        loop {
            let may_call_tools = hops < self.settings.max_tool_hops && !definitions.is_empty();
            let declared = may_call_tools.then_some(definitions.as_slice());

            let reply = self.model.invoke(&conversation, declared).await?;
            let calls = reply.tool_calls();

            if !may_call_tools || calls.is_empty() {
                if !calls.is_empty() {
                    debug!(ignored = calls.len(), "tool budget spent, ignoring tool calls");
                }
                let answer = reply.message.content.clone();
                conversation.push(Message::assistant(answer.clone()));
                info!(hops, tools_run = tool_invocations.len(), "exchange completed");
                return Ok(Exchange {
                    answer,
                    conversation,
                    tool_invocations,
                });
            }

            if calls.len() > 1 {
                debug!(ignored = calls.len() - 1, "only the first tool call is honoured");
            }
            let call = calls[0].clone();
            let outcome = self.run_tool(&call).await?;

            conversation.push(
                MessageBuilder::new(MessageRole::Assistant, reply.message.content.clone())
                    .with_tool_calls(vec![call.clone()])
                    .build(),
            );
            conversation.push(Message::tool(call.id.clone(), outcome.render()));
            tool_invocations.push(ToolInvocation { call, outcome });
            hops += 1;
        }
    }

    async fn run_tool(&self, call: &ToolCall) -> Result<ToolOutcome, AgentError> {
        let name = call.name();
        let tool = self.tools.get(name).ok_or_else(|| {
            warn!(tool = name, "model requested an unregistered tool");
            AgentError::UnknownTool {
                name: name.to_string(),
            }
        })?;

        let arguments = call
            .parsed_arguments()
            .map_err(|e| AgentError::InvalidToolArguments {
                tool: name.to_string(),
                message: format!("arguments are not valid JSON: {}", e),
            })?;

        info!(tool = name, call_id = %call.id, %arguments, "running tool");
        let outcome = tool.invoke(arguments).await?;
        debug!(tool = name, success = outcome.is_success(), "tool finished");
        Ok(outcome)
    }
}
