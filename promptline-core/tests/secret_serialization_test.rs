//! Secrets persist unredacted but never print

use promptline_core::config::{ModelConfig, ProviderType, SecretString};

#[test]
fn test_model_config_json_roundtrip_keeps_key() {
    let model = ModelConfig::new(ProviderType::Google, "gemini-2.0-flash", "AIzaSy-secret-123");

    let json = serde_json::to_string(&model).unwrap();
    assert!(json.contains("AIzaSy-secret-123"));
    assert!(!json.contains("[REDACTED]"));

    let back: ModelConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.api_key.expose_secret(), "AIzaSy-secret-123");
    assert_eq!(back.model, "gemini-2.0-flash");

    assert_eq!(format!("{:?}", back.api_key), "[REDACTED]");
    assert_eq!(format!("{}", back.api_key), "[REDACTED]");
    assert!(!format!("{:?}", back).contains("secret-123"));
}

#[test]
fn test_yaml_roundtrip() {
    let model = ModelConfig::new(ProviderType::OpenAI, "gpt-4o-mini", SecretString::new("sk-yaml-value"));

    let yaml = serde_yaml::to_string(&model).unwrap();
    assert!(yaml.contains("sk-yaml-value"));

    let back: ModelConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back.api_key.expose_secret(), "sk-yaml-value");
    assert_eq!(back.provider, ProviderType::OpenAI);
}
