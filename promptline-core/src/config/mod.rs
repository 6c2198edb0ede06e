//! Configuration module
//!
//! Configuration comes from `LLM_*` environment variables (optionally seeded
//! from a `.env` file) or from a YAML file with `${VAR}` interpolation.

mod env;
mod error;
mod schema;
mod secrets;
mod validator;

pub use env::{
    load_dotenv, parse_dotenv, LLM_API_KEY, LLM_BASE_URL, LLM_MODEL, LLM_PROVIDER,
    LLM_TEMPERATURE, LLM_TIMEOUT_SECS,
};
pub use error::{ConfigError, ConfigResult, ValidationError, ValidationErrorKind};
pub use schema::{
    AgentSettings, ConnectionConfig, ModelConfig, PromptlineConfig, ProviderType, SessionSettings,
};
pub use secrets::SecretString;
pub use validator::ConfigValidator;

use std::fs;
use std::path::Path;

/// Load a configuration from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> ConfigResult<PromptlineConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    load_from_yaml_str(&content, &path.to_string_lossy())
}

/// Parse YAML configuration text; `origin` is used in error messages
pub fn load_from_yaml_str(content: &str, origin: &str) -> ConfigResult<PromptlineConfig> {
    // Interpolate environment variables before parsing
    let interpolated = env::interpolate_env_vars(content)?;

    let mut config: PromptlineConfig =
        serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: origin.to_string(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })?;

    env::interpolate_config_env_vars(&mut config)?;

    ConfigValidator::new().validate(&config)?;
    Ok(config)
}
