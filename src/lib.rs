//! # SQL Query Fixer Library
//!
//! Schema-aware SQL query correction backed by an LLM.

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod schema;
pub mod server;
