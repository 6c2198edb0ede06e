//! Configuration validation utilities

use super::error::ValidationError;
use super::schema::PromptlineConfig;
use regex::Regex;

/// Configuration validator with additional validation rules
pub struct ConfigValidator {
    /// Pattern for placeholders that survived interpolation
    env_var_pattern: Regex,
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            env_var_pattern: Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap(),
        }
    }

    /// Validate a configuration with extended rules
    pub fn validate(&self, config: &PromptlineConfig) -> Result<(), ValidationError> {
        // First run the built-in validation
        config.validate()?;

        self.validate_no_placeholders(config)?;

        if config.agent.max_tool_hops > 1 {
            tracing::debug!(
                max_tool_hops = config.agent.max_tool_hops,
                "multi-hop tool use enabled"
            );
        }

        Ok(())
    }

    /// Reject `${VAR}` placeholders that were never resolved
    fn validate_no_placeholders(&self, config: &PromptlineConfig) -> Result<(), ValidationError> {
        if self
            .env_var_pattern
            .is_match(config.model.api_key.expose_secret())
        {
            return Err(ValidationError::required("model.api_key")
                .with_context("API key still contains an unresolved ${VAR} placeholder"));
        }

        if let Some(base_url) = &config.model.base_url {
            if self.env_var_pattern.is_match(base_url) {
                return Err(ValidationError::required("model.base_url")
                    .with_context("base URL still contains an unresolved ${VAR} placeholder"));
            }
        }

        Ok(())
    }
}
