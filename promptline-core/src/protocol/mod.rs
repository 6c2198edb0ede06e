//! Protocol module for LLM request/response structures
//!
//! This module defines the canonical data models for interacting with the
//! language model endpoint. These structures are designed to be:
//! - Provider-agnostic
//! - Append-only when forming a conversation
//! - Type-safe and serializable

pub mod types;

pub use types::{
    ChatRequest, ChatResponse, CompletionUsage, FunctionCall, FunctionChoice, FunctionDefinition,
    Message, MessageRole, ResponseChoice, ResponseFormat, ToolCall, ToolChoice, ToolDefinition,
};

// Re-export common traits for convenience
pub use types::{IntoMessage, MessageBuilder};
