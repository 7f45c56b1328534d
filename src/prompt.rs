//! Prompt assembly for the correction and explanation calls.
//!
//! Two request shapes feed one transport:
//!
//! - [`correction_request`] builds a role-split chat request: a fixed system
//!   instruction plus a user block with the broken SQL, optionally prefixed by
//!   serialized schema context.
//! - [`explanation_request`] flattens an instruction template and both query
//!   versions into a single free-text block, then routes it through the same
//!   correction framing. The explanation call therefore has no independent
//!   system/user split, which keeps the client contract to a single
//!   completion method.

use std::{fs, path::Path};

use serde::Serialize;

use crate::schema::Schema;

/// System instruction for the correction call
pub const CORRECTION_SYSTEM_PROMPT: &str = "You are a helpful SQL assistant. Your task is to fix \
                                            any syntax or logical errors in the provided SQL \
                                            query. Respond with ONLY the corrected SQL query, \
                                            nothing else.";

/// Built-in explanation instruction, used when no template file is available
pub const FALLBACK_EXPLANATION_PROMPT: &str = "You are a helpful SQL assistant. Explain the \
                                               errors in the original SQL query and how they \
                                               were fixed in the corrected version. Be concise \
                                               and clear. Focus only on the SQL syntax and \
                                               logical changes.";

/// One role-tagged block of a chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role:    String,
    pub content: String
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role:    String::from("system"),
            content: content.into()
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role:    String::from("user"),
            content: content.into()
        }
    }
}

/// Build the chat request for a correction call.
///
/// The schema context is prepended to the user block only when the schema is
/// non-empty; an absent schema leaves no trace in the request.
pub fn correction_request(bad_sql: &str, schema: &Schema) -> Vec<ChatMessage> {
    let query_block = format!("Broken SQL:\n{}", bad_sql);
    let content = if schema.is_empty() {
        query_block
    } else {
        format!(
            "The database schema is as follows:\n{}\n\n{}",
            schema.to_context(),
            query_block
        )
    };
    vec![
        ChatMessage::system(CORRECTION_SYSTEM_PROMPT),
        ChatMessage::user(content),
    ]
}

/// Instruction text for the explanation call, loaded from an external file
/// with an infallible built-in fallback.
#[derive(Debug, Clone)]
pub struct ExplanationTemplate {
    instruction: String
}

impl Default for ExplanationTemplate {
    fn default() -> Self {
        Self {
            instruction: String::from(FALLBACK_EXPLANATION_PROMPT)
        }
    }
}

impl ExplanationTemplate {
    /// Load the template from `path`, falling back to the built-in
    /// instruction when the file is missing or unreadable.
    pub fn load(path: impl AsRef<Path>) -> Self {
        match fs::read_to_string(path.as_ref()) {
            Ok(text) if !text.trim().is_empty() => Self {
                instruction: text.trim().to_string()
            },
            Ok(_) | Err(_) => {
                tracing::debug!(
                    "explanation template '{}' unavailable, using built-in instruction",
                    path.as_ref().display()
                );
                Self::default()
            }
        }
    }

    /// Render the flat explanation prompt for an original/corrected pair.
    pub fn render(&self, original_sql: &str, corrected_sql: &str) -> String {
        format!(
            "{}\n\nOriginal SQL:\n{}\n\nCorrected SQL:\n{}\n\nExplanation:",
            self.instruction, original_sql, corrected_sql
        )
    }
}

/// Build the chat request for an explanation call.
///
/// The rendered template travels through the correction framing as if it were
/// a query to fix; the transport cannot tell the two request kinds apart.
pub fn explanation_request(
    original_sql: &str,
    corrected_sql: &str,
    template: &ExplanationTemplate
) -> Vec<ChatMessage> {
    let rendered = template.render(original_sql, corrected_sql);
    correction_request(&rendered, &Schema::default())
}
