//! Role-tagged message templates

use super::error::PromptError;
use super::template::{PromptTemplate, PromptValues};
use crate::protocol::{Message, MessageBuilder, MessageRole};

/// One templated message of a chat prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    pub role: MessageRole,
    pub template: PromptTemplate,
}

impl MessageTemplate {
    pub fn new(role: MessageRole, template: PromptTemplate) -> Self {
        Self { role, template }
    }

    pub fn format(&self, values: &PromptValues) -> Result<Message, PromptError> {
        let content = self.template.format(values)?;
        Ok(MessageBuilder::new(self.role, content).build())
    }
}

/// A sequence of message templates rendered together into a conversation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatPromptTemplate {
    messages: Vec<MessageTemplate>,
}

impl ChatPromptTemplate {
    /// Build from `(role, template)` pairs. Roles accept the usual aliases
    /// (`human`, `ai`).
    pub fn from_messages<R, T, I>(messages: I) -> Result<Self, PromptError>
    where
        R: AsRef<str>,
        T: Into<String>,
        I: IntoIterator<Item = (R, T)>,
    {
        let messages = messages
            .into_iter()
            .map(|(role, text)| {
                let role = MessageRole::parse(role.as_ref()).ok_or_else(|| PromptError::UnknownRole {
                    role: role.as_ref().to_string(),
                })?;
                Ok(MessageTemplate::new(role, PromptTemplate::new(text)?))
            })
            .collect::<Result<Vec<_>, PromptError>>()?;
        Ok(Self { messages })
    }

    /// A single user message template
    pub fn from_template(text: impl Into<String>) -> Result<Self, PromptError> {
        Ok(Self {
            messages: vec![MessageTemplate::new(MessageRole::User, PromptTemplate::new(text)?)],
        })
    }

    /// A fixed system instruction followed by the user's `{input}`
    pub fn system_with_input(instruction: impl Into<String>) -> Self {
        Self {
            messages: vec![
                MessageTemplate::new(MessageRole::System, PromptTemplate::literal(instruction)),
                MessageTemplate::new(MessageRole::User, PromptTemplate::variable("input")),
            ],
        }
    }

    /// Append another message template
    pub fn push(mut self, role: MessageRole, template: PromptTemplate) -> Self {
        self.messages.push(MessageTemplate::new(role, template));
        self
    }

    pub fn messages(&self) -> &[MessageTemplate] {
        &self.messages
    }

    /// Placeholder names across all messages in first-seen order
    pub fn input_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for message in &self.messages {
            for name in message.template.input_variables() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Render every message template
    pub fn format_messages(&self, values: &PromptValues) -> Result<Vec<Message>, PromptError> {
        self.messages.iter().map(|m| m.format(values)).collect()
    }
}
