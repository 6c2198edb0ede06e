//! Prompt → model chains and tabular prompt inputs

mod table;

pub use table::TableSnapshot;

use crate::model::ChatModel;
use crate::prompt::{ChatPromptTemplate, PromptError, PromptValues};
use crate::providers::ProviderError;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised by chains and table snapshots
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("model endpoint failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("prompt rendering failed: {0}")]
    Prompt(#[from] PromptError),

    #[error("table has no header row")]
    EmptyTable,

    #[error("row {line} has {found} fields, expected {expected}")]
    MalformedTable {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A prompt template piped into a model: render, invoke once, return the text
pub struct LlmChain {
    prompt: ChatPromptTemplate,
    model: Arc<dyn ChatModel>,
}

impl LlmChain {
    pub fn new(prompt: ChatPromptTemplate, model: Arc<dyn ChatModel>) -> Self {
        Self { prompt, model }
    }

    pub fn prompt(&self) -> &ChatPromptTemplate {
        &self.prompt
    }

    pub async fn invoke(&self, values: &PromptValues) -> Result<String, ChainError> {
        let messages = self.prompt.format_messages(values)?;
        debug!(messages = messages.len(), "invoking chain");
        let reply = self.model.invoke(&messages, None).await?;
        Ok(reply.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScriptedChatModel;
    use crate::protocol::Message;

    #[tokio::test]
    async fn test_chain_renders_then_invokes_once() {
        let model = Arc::new(ScriptedChatModel::with_texts(["Arrr, sorry matey."]));
        let prompt = ChatPromptTemplate::from_template(
            "Translate the text that is delimited by triple backticks into a style that is {style}. text: ```{text}```",
        )
        .unwrap();
        let chain = LlmChain::new(prompt, model.clone());

        let answer = chain
            .invoke(&PromptValues::new().set("style", "pirate").set("text", "Sorry."))
            .await
            .unwrap();

        assert_eq!(answer, "Arrr, sorry matey.");
        assert_eq!(
            model.calls()[0].messages,
            vec![Message::user(
                "Translate the text that is delimited by triple backticks into a style that is pirate. text: ```Sorry.```"
            )]
        );
    }

    #[tokio::test]
    async fn test_missing_variable_skips_model() {
        let model = Arc::new(ScriptedChatModel::with_texts(["unused"]));
        let chain = LlmChain::new(ChatPromptTemplate::from_template("{product}").unwrap(), model.clone());
        let err = chain.invoke(&PromptValues::new()).await.unwrap_err();
        assert!(matches!(err, ChainError::Prompt(PromptError::MissingVariable { .. })));
        assert_eq!(model.call_count(), 0);
    }
}
