//! Lightweight syntax check for corrected queries.
//!
//! The verdict is deliberately weak: the input is only tokenized, not parsed
//! against a grammar. A misspelled keyword tokenizes as a plain identifier and
//! passes, so `SELET * FROM users` is reported as valid. The check exists to
//! catch completions that are not statement-shaped at all (empty output, prose
//! with unterminated quotes), and its result is advisory, never blocking.
//!
//! Blank and whitespace-only input is reported invalid. Tokenizers that count
//! an empty statement as parsed would accept it; this check diverges there on
//! purpose so an empty completion is flagged.

use sqlparser::tokenizer::{Token, Tokenizer};

use crate::schema::SqlDialect;

/// Check whether a SQL string tokenizes into at least one statement-shaped
/// sequence of tokens.
pub fn is_valid_syntax(sql: &str, dialect: SqlDialect) -> bool {
    let parser_dialect = dialect.into_parser_dialect();
    match Tokenizer::new(parser_dialect.as_ref(), sql).tokenize() {
        Ok(tokens) => tokens
            .iter()
            .any(|token| !matches!(token, Token::Whitespace(_))),
        Err(_) => false
    }
}
