//! Environment-driven configuration
//!
//! Covers `${VAR}` interpolation in config files, `.env` loading and the
//! `LLM_*` variables read at process start.

use super::error::ConfigError;
use super::schema::{ModelConfig, PromptlineConfig, ProviderType};
use super::secrets::SecretString;
use regex::Regex;
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

/// Model identifier
pub const LLM_MODEL: &str = "LLM_MODEL";
/// API key / credential
pub const LLM_API_KEY: &str = "LLM_API_KEY";
/// Provider identifier (openai, google, custom)
pub const LLM_PROVIDER: &str = "LLM_PROVIDER";
/// Optional base URL override
pub const LLM_BASE_URL: &str = "LLM_BASE_URL";
/// Optional sampling temperature
pub const LLM_TEMPERATURE: &str = "LLM_TEMPERATURE";
/// Optional request timeout in seconds
pub const LLM_TIMEOUT_SECS: &str = "LLM_TIMEOUT_SECS";

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Interpolate environment variables in a configuration string
pub fn interpolate_env_vars(content: &str) -> Result<String, ConfigError> {
    let mut missing_vars = Vec::new();

    let result = ENV_VAR_PATTERN.replace_all(content, |cap: &regex::Captures<'_>| {
        match env::var(&cap[1]) {
            Ok(value) => value,
            Err(_) => {
                missing_vars.push(cap[1].to_string());
                String::new()
            }
        }
    });

    // Report the first missing variable
    if let Some(var) = missing_vars.into_iter().next() {
        return Err(ConfigError::EnvVarNotFound { var });
    }

    Ok(result.into_owned())
}

/// Interpolate any placeholders left in secret-bearing fields after parsing
pub fn interpolate_config_env_vars(config: &mut PromptlineConfig) -> Result<(), ConfigError> {
    let api_key = config.model.api_key.expose_secret();
    if ENV_VAR_PATTERN.is_match(api_key) {
        config.model.api_key = SecretString::new(interpolate_env_vars(api_key)?);
    }

    if let Some(base_url) = &config.model.base_url {
        if ENV_VAR_PATTERN.is_match(base_url) {
            config.model.base_url = Some(interpolate_env_vars(base_url)?);
        }
    }

    Ok(())
}

/// Parse `.env` content into key/value pairs.
///
/// Supports `KEY=VALUE`, an optional `export ` prefix, `#` comments and
/// single or double quoted values.
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unquote(value.trim()).to_string()))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(end) = value.strip_prefix(quote).and_then(|rest| rest.find(quote)) {
            return &value[1..=end];
        }
    }
    // Unquoted values may carry a trailing comment
    match value.find(" #") {
        Some(idx) => value[..idx].trim_end(),
        None => value,
    }
}

/// Load a `.env` file into the process environment.
///
/// Variables that are already set win over the file. Returns how many
/// variables were set. A missing file is not an error.
pub fn load_dotenv<P: AsRef<Path>>(path: P) -> Result<usize, ConfigError> {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(ConfigError::IoError {
                path: path.to_string_lossy().to_string(),
                source: e,
            })
        }
    };

    let mut loaded = 0;
    for (key, value) in parse_dotenv(&content) {
        if env::var_os(&key).is_none() {
            env::set_var(&key, value);
            loaded += 1;
        }
    }

    tracing::debug!(path = %path.display(), loaded, "loaded dotenv file");
    Ok(loaded)
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::EnvVarNotFound {
            var: name.to_string(),
        }),
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var<T>(name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional_var(name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
                var: name.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
}

impl ModelConfig {
    /// Read the model endpoint configuration from `LLM_*` variables.
    ///
    /// `LLM_MODEL` and `LLM_API_KEY` are required; `LLM_PROVIDER` defaults
    /// to `google`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let model = required_var(LLM_MODEL)?;
        let api_key = required_var(LLM_API_KEY)?;

        let provider = match optional_var(LLM_PROVIDER) {
            Some(raw) => ProviderType::parse(&raw).ok_or_else(|| ConfigError::InvalidEnvVar {
                var: LLM_PROVIDER.to_string(),
                message: format!("unknown provider '{raw}'"),
            })?,
            None => ProviderType::default(),
        };

        let mut config = ModelConfig::new(provider, model.trim(), SecretString::new(api_key));
        config.base_url = optional_var(LLM_BASE_URL);
        if let Some(temperature) = parse_var::<f32>(LLM_TEMPERATURE)? {
            config.temperature = temperature;
        }

        config.validate("model")?;
        Ok(config)
    }
}

impl PromptlineConfig {
    /// Build the full configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = PromptlineConfig::new(ModelConfig::from_env()?);
        if let Some(secs) = parse_var::<u64>(LLM_TIMEOUT_SECS)? {
            config.connection.request_timeout_ms = secs.saturating_mul(1000);
        }
        config.validate()?;
        Ok(config)
    }
}
