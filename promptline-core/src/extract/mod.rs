//! Structured extraction
//!
//! A [`StructuredExtractor`] renders one prompt that embeds the document, the
//! field list and format instructions, invokes the model once and validates
//! the reply against an [`ExtractionSchema`]. Malformed replies are errors;
//! nothing is repaired or retried.

mod parser;
mod schema;

pub use parser::JsonOutputParser;
pub use schema::{ExtractionSchema, FieldKind, FieldSpec};

use crate::model::ChatModel;
use crate::prompt::{ChatPromptTemplate, PromptError, PromptValues};
use crate::providers::ProviderError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Prompt used by [`StructuredExtractor::new`]
pub const DEFAULT_EXTRACTION_TEMPLATE: &str = "For the following text, extract the following information:

JSON Keys:
{schema}

text: {text}

{format_instructions}
";

/// Errors raised by extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("malformed model output: {message}")]
    MalformedOutput { message: String, raw: String },

    #[error("model endpoint failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("prompt rendering failed: {0}")]
    Prompt(#[from] PromptError),
}

/// Pulls schema-shaped records out of free text
pub struct StructuredExtractor {
    model: Arc<dyn ChatModel>,
    prompt: ChatPromptTemplate,
    parser: JsonOutputParser,
}

impl StructuredExtractor {
    pub fn new(model: Arc<dyn ChatModel>) -> Result<Self, ExtractError> {
        Ok(Self::with_prompt(
            model,
            ChatPromptTemplate::from_template(DEFAULT_EXTRACTION_TEMPLATE)?,
        ))
    }

    /// Use a custom prompt. It may reference `{text}`, `{schema}` and
    /// `{format_instructions}`.
    pub fn with_prompt(model: Arc<dyn ChatModel>, prompt: ChatPromptTemplate) -> Self {
        Self {
            model,
            prompt,
            parser: JsonOutputParser::new(),
        }
    }

    /// Extract a record holding exactly the schema's keys
    pub async fn extract(
        &self,
        document: &str,
        schema: &ExtractionSchema,
    ) -> Result<Map<String, Value>, ExtractError> {
        let instructions = format!(
            "{}\n{}",
            self.parser.format_instructions(),
            schema.format_instructions()
        );
        let values = PromptValues::new()
            .set("text", document)
            .set("schema", schema.describe())
            .set("format_instructions", instructions);
        let messages = self.prompt.format_messages(&values)?;

        let reply = self.model.invoke(&messages, None).await?;
        let raw = reply.text();
        debug!(chars = raw.len(), "extraction reply received");

        let parsed = self.parser.parse(raw)?;
        schema.validate(parsed, raw).inspect_err(|e| {
            warn!(error = %e, "extraction reply did not match schema");
        })
    }

    /// Extract and deserialize into `T`
    pub async fn extract_as<T: DeserializeOwned>(
        &self,
        document: &str,
        schema: &ExtractionSchema,
    ) -> Result<T, ExtractError> {
        let record = self.extract(document, schema).await?;
        let value = Value::Object(record);
        serde_json::from_value(value.clone()).map_err(|e| ExtractError::MalformedOutput {
            message: format!("record does not fit the target type: {}", e),
            raw: value.to_string(),
        })
    }
}
