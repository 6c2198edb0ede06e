//! Prompt rendering
//!
//! [`PromptTemplate`] renders `{name}` placeholders from [`PromptValues`];
//! [`ChatPromptTemplate`] renders a role-tagged message sequence.

mod chat;
mod error;
mod template;

pub use chat::{ChatPromptTemplate, MessageTemplate};
pub use error::PromptError;
pub use template::{PromptTemplate, PromptValues};
