//! Promptline Core Library
//!
//! A small orchestration layer over hosted chat-completion APIs: prompt
//! templates, single-shot chains, a tool-calling responder, session-scoped
//! conversations and structured extraction.

pub mod agent;
pub mod chain;
pub mod config;
pub mod extract;
pub mod http;
pub mod model;
pub mod prompt;
pub mod protocol;
pub mod providers;
pub mod session;
pub mod tools;

pub use agent::{AgentError, Exchange, ToolAugmentedResponder, ToolInvocation};
pub use chain::{ChainError, LlmChain, TableSnapshot};
pub use config::{ConfigError, PromptlineConfig};
pub use extract::{ExtractError, ExtractionSchema, FieldKind, JsonOutputParser, StructuredExtractor};
pub use model::{ChatModel, ModelReply, RemoteChatModel, ScriptedChatModel};
pub use prompt::{ChatPromptTemplate, PromptError, PromptTemplate, PromptValues};
pub use protocol::{Message, MessageRole};
pub use providers::ProviderError;
pub use session::{ConversationalResponder, HistoryPolicy, InMemorySessionStore, SessionError, SessionStore};
pub use tools::{Tool, ToolError, ToolOutcome, ToolRegistry, WikipediaSearch};

/// Returns the version of the Promptline Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
