//! Tools the model may call
//!
//! A [`Tool`] declares a name, a description and a JSON schema for its
//! arguments. Running a tool yields a [`ToolOutcome`]; the error path is
//! reserved for arguments the tool refuses to run with.

mod wikipedia;

pub use wikipedia::{WikipediaSearch, DEFAULT_WIKIPEDIA_URL};

use crate::protocol::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised before a tool runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("invalid arguments for tool '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },
}

/// What running a tool produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    /// The tool answered
    Success { text: String },
    /// The query matched several entries
    Disambiguation { query: String, options: Vec<String> },
    /// Nothing matched the query
    NotFound { query: String },
    /// The tool failed for another reason; the message is shown to the model as is
    Failed { message: String },
}

impl ToolOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        ToolOutcome::Success { text: text.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ToolOutcome::Failed {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }

    /// Flatten to the text handed back to the model
    pub fn render(&self) -> String {
        match self {
            ToolOutcome::Success { text } => text.clone(),
            ToolOutcome::Disambiguation { options, .. } => {
                let quoted: Vec<String> = options.iter().map(|o| format!("'{}'", o)).collect();
                format!(
                    "Multiple results found. Please be more specific. Options: [{}]",
                    quoted.join(", ")
                )
            }
            ToolOutcome::NotFound { .. } => "Could not find information on that topic.".to_string(),
            ToolOutcome::Failed { message } => message.clone(),
        }
    }
}

/// A capability the model may request by name
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call the tool
    fn name(&self) -> &str;

    /// What the tool does, shown to the model
    fn description(&self) -> &str;

    /// JSON schema of the argument object
    fn parameters_schema(&self) -> Value;

    /// Declaration sent alongside the conversation
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(self.name(), self.description(), self.parameters_schema())
    }

    /// Run the tool
    async fn invoke(&self, arguments: Value) -> Result<ToolOutcome, ToolError>;
}

/// Read a required, non-blank string argument
pub fn required_str<'a>(tool: &str, arguments: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    match arguments.get(key).and_then(Value::as_str) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(ToolError::InvalidArguments {
            tool: tool.to_string(),
            message: format!("'{}' must not be empty", key),
        }),
        None => Err(ToolError::InvalidArguments {
            tool: tool.to_string(),
            message: format!("missing string argument '{}'", key),
        }),
    }
}

/// Name → tool lookup, in registration order
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.index.get(tool.name()) {
            Some(&slot) => self.tools[slot] = tool,
            None => {
                self.index.insert(tool.name().to_string(), self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.register(Arc::new(tool));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&slot| Arc::clone(&self.tools[slot]))
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Declarations for every registered tool
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
