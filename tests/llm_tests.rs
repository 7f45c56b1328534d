// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_query_fixer::{
    config::RetryConfig,
    llm::{LlmClient, LlmProvider, strip_code_fence},
    prompt::correction_request,
    schema::Schema
};

#[test]
fn test_strip_sql_fence() {
    let text = "```sql\nSELECT * FROM users;\n```";
    assert_eq!(strip_code_fence(text), "SELECT * FROM users;");
}

#[test]
fn test_strip_plain_fence() {
    let text = "```\nSELECT * FROM users;\n```";
    assert_eq!(strip_code_fence(text), "SELECT * FROM users;");
}

#[test]
fn test_unfenced_text_trimmed_only() {
    let text = "  SELECT * FROM users;  \n";
    assert_eq!(strip_code_fence(text), "SELECT * FROM users;");
}

#[test]
fn test_opening_fence_without_closing_passes_through() {
    let text = "```sql\nSELECT 1;";
    assert_eq!(strip_code_fence(text), "```sql\nSELECT 1;");
}

#[test]
fn test_fence_with_surrounding_whitespace() {
    let text = "\n  ```sql\nSELECT 1;\n```  \n";
    assert_eq!(strip_code_fence(text), "SELECT 1;");
}

#[test]
fn test_backticks_inside_text_untouched() {
    let text = "SELECT '```' FROM t;";
    assert_eq!(strip_code_fence(text), "SELECT '```' FROM t;");
}

fn unreachable_client() -> LlmClient {
    // Port 9 (discard) is never listening locally; connections fail fast
    LlmClient::with_retry_config(
        LlmProvider::Ollama {
            base_url: String::from("http://127.0.0.1:9"),
            model:    String::from("test")
        },
        RetryConfig {
            max_retries:      0,
            initial_delay_ms: 1,
            max_delay_ms:     1,
            backoff_factor:   1.0
        },
        200
    )
}

#[tokio::test]
async fn test_endpoint_failure_is_error_not_panic() {
    let client = unreachable_client();
    let messages = correction_request("SELET 1;", &Schema::default());
    let result = client.complete(&messages).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_fix_sql_failure_propagates_as_app_error() {
    let client = unreachable_client();
    let result = client.fix_sql("SELET 1;", &Schema::default()).await;
    let err = result.unwrap_err();
    // The caller renders this inline; the message must describe the failure
    assert!(!err.to_string().is_empty());
}
