// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use std::io::Write;

use sql_query_fixer::{
    prompt::{
        CORRECTION_SYSTEM_PROMPT, ExplanationTemplate, FALLBACK_EXPLANATION_PROMPT,
        correction_request, explanation_request
    },
    schema::{Schema, SqlDialect}
};

#[test]
fn test_correction_request_without_schema() {
    let messages = correction_request("SELET * FROM users;", &Schema::default());
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "system");
    assert_eq!(messages[0].content, CORRECTION_SYSTEM_PROMPT);
    assert_eq!(messages[1].role, "user");
    assert!(messages[1].content.contains("Broken SQL:\nSELET * FROM users;"));
    // No schema section at all when no schema is available
    assert!(!messages[1].content.contains("database schema"));
}

#[test]
fn test_correction_request_with_schema() {
    let ddl = "CREATE TABLE users (id INT, name VARCHAR(50));";
    let schema = Schema::parse(ddl, SqlDialect::default()).unwrap();
    let messages = correction_request("SELET * FROM users;", &schema);

    let user = &messages[1].content;
    assert!(user.contains("The database schema is as follows:"));
    assert!(user.contains("users"));
    assert!(user.contains("id"));
    assert!(user.contains("name"));
    assert!(user.contains("Broken SQL:\nSELET * FROM users;"));
    // Schema context comes before the query text
    assert!(user.find("database schema").unwrap() < user.find("Broken SQL:").unwrap());
}

#[test]
fn test_empty_schema_same_as_absent() {
    let empty = Schema::from_ddl("not ddl at all {", SqlDialect::default());
    let from_empty = correction_request("SELECT 1;", &empty);
    let from_default = correction_request("SELECT 1;", &Schema::default());
    assert_eq!(from_empty[1].content, from_default[1].content);
}

#[test]
fn test_explanation_template_fallback_when_missing() {
    let template = ExplanationTemplate::load("/nonexistent/path/prompt.txt");
    let rendered = template.render("SELET 1;", "SELECT 1;");
    assert!(rendered.starts_with(FALLBACK_EXPLANATION_PROMPT));
}

#[test]
fn test_explanation_template_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Explain the fix in one sentence.").unwrap();
    let template = ExplanationTemplate::load(file.path());
    let rendered = template.render("SELET 1;", "SELECT 1;");
    assert!(rendered.starts_with("Explain the fix in one sentence."));
}

#[test]
fn test_explanation_template_empty_file_falls_back() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let template = ExplanationTemplate::load(file.path());
    let rendered = template.render("a", "b");
    assert!(rendered.starts_with(FALLBACK_EXPLANATION_PROMPT));
}

#[test]
fn test_explanation_render_layout() {
    let template = ExplanationTemplate::default();
    let rendered = template.render("SELET * FROM users;", "SELECT * FROM users;");
    assert!(rendered.contains("Original SQL:\nSELET * FROM users;"));
    assert!(rendered.contains("Corrected SQL:\nSELECT * FROM users;"));
    assert!(rendered.ends_with("Explanation:"));
}

#[test]
fn test_explanation_request_reuses_correction_framing() {
    let template = ExplanationTemplate::default();
    let messages = explanation_request("SELET 1;", "SELECT 1;", &template);
    // Same shape as a correction call: the transport cannot tell them apart
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, CORRECTION_SYSTEM_PROMPT);
    assert!(messages[1].content.starts_with("Broken SQL:\n"));
    assert!(messages[1].content.contains("Original SQL:\nSELET 1;"));
    assert!(messages[1].content.contains("Corrected SQL:\nSELECT 1;"));
    assert!(messages[1].content.ends_with("Explanation:"));
}
