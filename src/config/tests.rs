use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn defaults_match_the_documented_surface() {
    let config = Config::default();

    assert_eq!(config.server.bind, "0.0.0.0");
    assert_eq!(config.server.port, 3001);
    assert_eq!(config.server.body_limit_bytes, 52_428_800);

    assert!(config.upstream.api_key.is_empty());
    assert_eq!(config.upstream.base_url, "https://api.openai.com/v1");
    assert_eq!(config.upstream.model, "gpt-4o");
    assert_eq!(config.upstream.max_tokens, 800);
    assert_eq!(config.upstream.timeout_seconds, 60);

    assert!(config.analysis.system_prompt.is_empty());
    assert_eq!(config.analysis.prompt, DEFAULT_ANALYSIS_PROMPT);

    assert_eq!(config.logging.level, "info");
}

#[test]
fn partial_toml_fills_remaining_fields_with_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[server]
port = 8080

[upstream]
api_key = "sk-test"
model = "gpt-4o-mini"
"#
    )
    .unwrap();

    let content = std::fs::read_to_string(file.path()).unwrap();
    let config: Config = toml::from_str(&content).unwrap();

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.bind, "0.0.0.0");
    assert_eq!(config.upstream.api_key, "sk-test");
    assert_eq!(config.upstream.model, "gpt-4o-mini");
    assert_eq!(config.upstream.max_tokens, 800);
}

#[test]
fn env_overrides_replace_key_and_port() {
    let mut config = Config::default();
    config.apply_overrides(Some("sk-env".to_string()), Some("4000".to_string()));

    assert_eq!(config.upstream.api_key, "sk-env");
    assert_eq!(config.server.port, 4000);
}

#[test]
fn blank_key_and_bad_port_are_ignored() {
    let mut config = Config::default();
    config.upstream.api_key = "sk-file".to_string();
    config.apply_overrides(Some("  ".to_string()), Some("not-a-port".to_string()));

    assert_eq!(config.upstream.api_key, "sk-file");
    assert_eq!(config.server.port, 3001);
}

#[test]
fn validate_requires_an_api_key() {
    let mut config = Config::default();
    assert!(config.validate().is_err());

    config.upstream.api_key = "sk-test".to_string();
    assert!(config.validate().is_ok());

    config.upstream.base_url = String::new();
    assert!(config.validate().is_err());
}
