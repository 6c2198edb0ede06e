//! JSON output parsing

use super::ExtractError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

// Closing fence optional
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)(?:```|\z)").unwrap());

/// Parses a completion as JSON, bare or inside a Markdown code fence
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOutputParser;

impl JsonOutputParser {
    pub fn new() -> Self {
        Self
    }

    /// Instruction appended to prompts whose reply is parsed by this parser
    pub fn format_instructions(&self) -> &'static str {
        "Return a JSON object."
    }

    /// Parse the completion text
    pub fn parse(&self, completion: &str) -> Result<Value, ExtractError> {
        let trimmed = completion.trim();
        let body = CODE_FENCE
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map_or(trimmed, |m| m.as_str().trim());

        serde_json::from_str(body).map_err(|e| ExtractError::MalformedOutput {
            message: format!("completion is not valid JSON: {}", e),
            raw: completion.to_string(),
        })
    }
}
