// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_query_fixer::config::{Config, DEFAULT_MAX_TOKENS, LlmConfig, ServerConfig};

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.llm.api_key.is_none());
    assert!(config.llm.provider.is_none());
    assert_eq!(
        config.llm.ollama_url.as_deref(),
        Some("http://localhost:11434")
    );
}

#[test]
fn test_default_retry_config() {
    let config = Config::default();

    assert_eq!(config.retry.max_retries, 3);
    assert_eq!(config.retry.initial_delay_ms, 1000);
    assert_eq!(config.retry.backoff_factor, 2.0);
}

#[test]
fn test_default_server_config() {
    let config = ServerConfig::default();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
    assert!(config.explain_prompt.to_string_lossy().contains("explain"));
}

#[test]
fn test_effective_max_tokens_default() {
    let config = LlmConfig::default();
    assert_eq!(config.effective_max_tokens(), DEFAULT_MAX_TOKENS);
}

#[test]
fn test_effective_max_tokens_override() {
    let config = LlmConfig {
        max_tokens: Some(512),
        ..Default::default()
    };
    assert_eq!(config.effective_max_tokens(), 512);
}

#[test]
fn test_parse_config_toml() {
    let toml = r#"
        [llm]
        provider = "openai"
        model = "gpt-4"
        max_tokens = 300

        [retry]
        max_retries = 1
        initial_delay_ms = 10
        max_delay_ms = 100
        backoff_factor = 1.5

        [server]
        host = "0.0.0.0"
        port = 9000
        explain_prompt = "custom/prompt.txt"
    "#;
    let config: Config = toml::from_str(toml).unwrap();

    assert_eq!(config.llm.provider.as_deref(), Some("openai"));
    assert_eq!(config.llm.model.as_deref(), Some("gpt-4"));
    assert_eq!(config.llm.effective_max_tokens(), 300);
    assert_eq!(config.retry.max_retries, 1);
    assert_eq!(config.server.port, 9000);
}

#[test]
fn test_parse_partial_config_toml() {
    let toml = r#"
        [llm]
        provider = "ollama"
    "#;
    let config: Config = toml::from_str(toml).unwrap();

    assert_eq!(config.llm.provider.as_deref(), Some("ollama"));
    assert_eq!(config.retry.max_retries, 3);
    assert_eq!(config.server.port, 8080);
}
