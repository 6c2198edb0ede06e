use thiserror::Error;

/// Errors raised while parsing or rendering prompt templates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("no value supplied for template variable '{name}'")]
    MissingVariable { name: String },

    #[error("unbalanced brace at byte {position}")]
    UnbalancedBrace { position: usize },

    #[error("invalid placeholder '{{{placeholder}}}'")]
    InvalidPlaceholder { placeholder: String },

    #[error("unknown message role '{role}'")]
    UnknownRole { role: String },
}
