//! HTTP error mapping utilities

use crate::providers::ProviderError;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

/// Map HTTP status code and response body to a ProviderError
pub fn map_http_error(
    status: StatusCode,
    headers: Option<&HeaderMap>,
    body: Option<String>,
    request_id: Uuid,
) -> ProviderError {
    // Try to parse error details from response body
    let error_details = body
        .as_ref()
        .and_then(|b| serde_json::from_str::<Value>(b).ok())
        .and_then(|v| extract_error_details(&v));

    let error_message = error_details
        .as_ref()
        .map(|d| d.message.clone())
        .or_else(|| body.clone().filter(|b| !b.trim().is_empty()))
        .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));

    let message_with_id = format!("{} [request_id: {}]", error_message, request_id);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError {
            message: message_with_id,
        },

        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = headers
                .and_then(|h| h.get(RETRY_AFTER))
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after)
                .or_else(|| {
                    error_details
                        .and_then(|d| d.retry_after_seconds)
                        .map(Duration::from_secs)
                });

            ProviderError::RateLimit { retry_after }
        }

        StatusCode::BAD_REQUEST => ProviderError::InvalidRequest {
            message: message_with_id,
        },

        StatusCode::NOT_FOUND => ProviderError::ModelNotAvailable {
            model: extract_model_from_error(&error_message).unwrap_or_else(|| "unknown".to_string()),
        },

        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ProviderError::Timeout,

        status if status.is_server_error() => ProviderError::ServerError {
            status_code: status.as_u16(),
            message: message_with_id,
        },

        status if status.is_client_error() => ProviderError::InvalidRequest {
            message: message_with_id,
        },

        _ => ProviderError::Custom {
            code: format!("HTTP_{}", status.as_u16()),
            message: message_with_id,
        },
    }
}

/// Error details extracted from response body
struct ErrorDetails {
    message: String,
    retry_after_seconds: Option<u64>,
}

/// Extract error details from JSON response
fn extract_error_details(json: &Value) -> Option<ErrorDetails> {
    // Gemini sometimes wraps the envelope in a one-element array
    if let Some(first) = json.as_array().and_then(|items| items.first()) {
        return extract_error_details(first);
    }

    // OpenAI/Gemini format: { "error": { "message": "...", ... } }
    if let Some(error) = json.get("error") {
        if let Some(message) = error.get("message").and_then(|v| v.as_str()) {
            return Some(ErrorDetails {
                message: message.to_string(),
                retry_after_seconds: error.get("retry_after").and_then(|v| v.as_u64()),
            });
        }
        if let Some(message) = error.as_str() {
            return Some(ErrorDetails {
                message: message.to_string(),
                retry_after_seconds: None,
            });
        }
    }

    // Generic format: { "message": "..." }
    json.get("message")
        .and_then(|v| v.as_str())
        .map(|message| ErrorDetails {
            message: message.to_string(),
            retry_after_seconds: json.get("retry_after").and_then(|v| v.as_u64()),
        })
}

/// Try to extract model name from error message
fn extract_model_from_error(message: &str) -> Option<String> {
    // Look for patterns like "model 'gpt-4' not found" or models/<name>
    for (prefix, terminator) in [("model '", '\''), ("model \"", '"'), ("models/", ' ')] {
        if let Some(start) = message.find(prefix) {
            let rest = &message[start + prefix.len()..];
            let end = rest.find(terminator).unwrap_or(rest.len());
            let model = rest[..end].trim_end_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '.');
            if !model.is_empty() {
                return Some(model.to_string());
            }
        }
    }

    None
}

/// Parse Retry-After header value (seconds form only)
pub fn parse_retry_after(header_value: &str) -> Option<Duration> {
    header_value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn id() -> Uuid {
        Uuid::nil()
    }

    #[test]
    fn test_auth_error() {
        let err = map_http_error(
            StatusCode::UNAUTHORIZED,
            None,
            Some(r#"{"error":{"message":"Incorrect API key provided"}}"#.to_string()),
            id(),
        );
        match err {
            ProviderError::AuthenticationError { message } => {
                assert!(message.contains("Incorrect API key"));
                assert!(message.contains("request_id"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_rate_limit_prefers_header() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("12"));
        let err = map_http_error(
            StatusCode::TOO_MANY_REQUESTS,
            Some(&headers),
            Some(r#"{"error":{"message":"slow down","retry_after":3}}"#.to_string()),
            id(),
        );
        assert!(matches!(
            err,
            ProviderError::RateLimit { retry_after: Some(d) } if d == Duration::from_secs(12)
        ));
    }

    #[test]
    fn test_gemini_array_envelope() {
        let err = map_http_error(
            StatusCode::BAD_REQUEST,
            None,
            Some(r#"[{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}]"#.to_string()),
            id(),
        );
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn test_model_not_found() {
        let err = map_http_error(
            StatusCode::NOT_FOUND,
            None,
            Some(r#"{"error":{"message":"The model 'gpt-5-nano' does not exist"}}"#.to_string()),
            id(),
        );
        assert!(matches!(err, ProviderError::ModelNotAvailable { model } if model == "gpt-5-nano"));
    }

    #[test]
    fn test_server_error_without_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, None, None, id());
        assert!(matches!(err, ProviderError::ServerError { status_code: 502, .. }));
    }
}
