// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_query_fixer::{check::is_valid_syntax, schema::SqlDialect};

#[test]
fn test_valid_select() {
    assert!(is_valid_syntax("SELECT * FROM users;", SqlDialect::default()));
}

#[test]
fn test_misspelled_keyword_still_passes() {
    // The verdict is token-level only: SELET tokenizes as an identifier, so
    // the check accepts it. This weakness is part of the contract.
    assert!(is_valid_syntax("SELET * FROM users;", SqlDialect::default()));
}

#[test]
fn test_empty_string_fails() {
    assert!(!is_valid_syntax("", SqlDialect::default()));
}

#[test]
fn test_whitespace_only_fails() {
    assert!(!is_valid_syntax("   \n\t  ", SqlDialect::default()));
}

#[test]
fn test_unterminated_string_fails() {
    assert!(!is_valid_syntax(
        "SELECT 'unterminated FROM users;",
        SqlDialect::default()
    ));
}

#[test]
fn test_multi_statement_input() {
    assert!(is_valid_syntax(
        "SELECT 1; SELECT 2;",
        SqlDialect::default()
    ));
}

#[test]
fn test_error_message_text_passes() {
    // A failure report injected into the result channel is still
    // statement-shaped to the tokenizer; the verdict stays advisory.
    assert!(is_valid_syntax(
        "Error: Could not fix query. Connection failed",
        SqlDialect::default()
    ));
}
