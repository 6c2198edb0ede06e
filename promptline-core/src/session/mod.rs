//! Session-scoped conversational responder
//!
//! Each session id owns one conversation. A turn renders the prompt, splices
//! the session's history in after the leading system messages, invokes the
//! model and appends the user input and the reply to the stored history.

mod policy;
mod store;

pub use policy::HistoryPolicy;
pub use store::{InMemorySessionStore, SessionHandle, SessionStore};

use crate::model::ChatModel;
use crate::prompt::{ChatPromptTemplate, PromptError, PromptValues};
use crate::protocol::Message;
use crate::providers::ProviderError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort a conversational turn
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("model endpoint failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("prompt rendering failed: {0}")]
    Prompt(#[from] PromptError),
}

/// Answers user input within a session, remembering earlier turns
pub struct ConversationalResponder {
    model: Arc<dyn ChatModel>,
    store: Arc<dyn SessionStore>,
    prompt: ChatPromptTemplate,
    policy: HistoryPolicy,
}

impl ConversationalResponder {
    /// `prompt` is rendered with the user's text bound to `input`
    pub fn new(
        model: Arc<dyn ChatModel>,
        store: Arc<dyn SessionStore>,
        prompt: ChatPromptTemplate,
    ) -> Self {
        Self {
            model,
            store,
            prompt,
            policy: HistoryPolicy::default(),
        }
    }

    /// A fixed system instruction followed by the user's input
    pub fn with_system_instruction(
        model: Arc<dyn ChatModel>,
        store: Arc<dyn SessionStore>,
        instruction: impl Into<String>,
    ) -> Self {
        Self::new(model, store, ChatPromptTemplate::system_with_input(instruction))
    }

    /// Limit how much history is sent per turn
    pub fn with_history_policy(mut self, policy: HistoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Run one turn. Turns against the same session are serialized.
    pub async fn respond(&self, session_id: &str, user_input: &str) -> Result<String, SessionError> {
        let rendered = self
            .prompt
            .format_messages(&PromptValues::new().set("input", user_input))?;

        let handle = self.store.session(session_id).await;
        let mut history = handle.lock().await;

        // History goes directly before the rendered input; only the input is stored
        let window = self.policy.window(&history);
        let (preamble, input) = match rendered.split_last() {
            Some((input, preamble)) => (preamble, Some(input)),
            None => (&rendered[..], None),
        };

        let mut messages = Vec::with_capacity(rendered.len() + window.len());
        messages.extend_from_slice(preamble);
        messages.extend_from_slice(window);
        messages.extend(input.cloned());

        debug!(
            session_id,
            stored = history.len(),
            sent = messages.len(),
            "invoking model for session turn"
        );

        let reply = self.model.invoke(&messages, None).await?;
        let answer = reply.message.content.clone();

        history.extend(input.cloned());
        history.push(Message::assistant(answer.clone()));

        info!(session_id, history = history.len(), "session turn completed");
        Ok(answer)
    }
}
