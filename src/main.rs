//! # SQL Query Fixer
//!
//! AI-powered SQL query correction service with schema-aware prompting.
//!
//! `sql-query-fixer` serves a small web form where a user pastes a broken SQL
//! query, optionally uploads a schema DDL file, and gets back a corrected
//! query, an advisory syntax verdict, and a natural-language explanation of
//! the fix. The correction and explanation come from a hosted LLM completion
//! endpoint; the schema context and the syntax verdict come from local
//! `sqlparser`-based processing.
//!
//! # Pipeline
//!
//! 1. **Schema extraction** - uploaded DDL is parsed into a table → columns
//!    mapping. Unparseable DDL silently degrades to "no schema".
//! 2. **Correction** - the broken query (plus schema context, when present)
//!    is sent to the configured provider; markdown fences are stripped from
//!    the completion.
//! 3. **Syntax check** - the corrected query is tokenized locally. The
//!    verdict is advisory and deliberately weak: it only confirms the text is
//!    statement-shaped.
//! 4. **Explanation** - both query versions are embedded in an instruction
//!    template and sent through the same completion path.
//!
//! # Quick Start
//!
//! ```bash
//! # Local Ollama, default model
//! sql-query-fixer serve
//!
//! # Hosted provider
//! export LLM_API_KEY="sk-..."
//! sql-query-fixer serve --provider open-ai --model gpt-4 --port 8080
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`LLM_API_KEY`, `LLM_PROVIDER`, etc.)
//! 3. `.sql-fixer.toml` in current directory
//! 4. `~/.config/sql-fixer/config.toml`
//!
//! # Modules
//!
//! - [`schema`] - DDL parsing into table → columns context
//! - [`prompt`] - correction and explanation request assembly
//! - [`llm`] - LLM provider integrations (OpenAI, Anthropic, Ollama)
//! - [`check`] - weak tokenizer-based syntax verdict
//! - [`server`] - axum router, form page, and JSON API
//! - [`config`] - configuration loading and validation
//! - [`error`] - error types and constructors

mod check;
mod cli;
mod config;
mod error;
mod llm;
mod prompt;
mod schema;
mod server;

use std::{process, sync::Arc};

use clap::Parser;
use tokio::main;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Cli, Commands, Dialect, Provider},
    config::Config,
    error::{AppResult, config_error},
    llm::{LlmClient, LlmProvider},
    prompt::ExplanationTemplate,
    schema::SqlDialect,
    server::AppState
};

#[main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            provider,
            api_key,
            model,
            ollama_url,
            dialect,
            explain_prompt
        } => {
            let sql_dialect = match dialect {
                Dialect::Generic => SqlDialect::Generic,
                Dialect::Mysql => SqlDialect::MySQL,
                Dialect::Postgresql => SqlDialect::PostgreSQL,
                Dialect::Sqlite => SqlDialect::SQLite
            };

            // Resolve credentials once at startup; the client owns them from
            // here on and nothing reads ambient state later.
            let effective_api_key = api_key.or(config.llm.api_key.clone());
            let effective_ollama_url = if ollama_url == "http://localhost:11434" {
                config.llm.ollama_url.clone().unwrap_or(ollama_url)
            } else {
                ollama_url
            };

            let model_name = model
                .or(config.llm.model.clone())
                .unwrap_or_else(|| provider.default_model().to_string());

            let llm_provider = match provider {
                Provider::OpenAI => {
                    let key = effective_api_key.ok_or_else(|| {
                        config_error("API key required for OpenAI (use --api-key or LLM_API_KEY)")
                    })?;
                    LlmProvider::OpenAI {
                        api_key: key,
                        model:   model_name
                    }
                }
                Provider::Anthropic => {
                    let key = effective_api_key.ok_or_else(|| {
                        config_error(
                            "API key required for Anthropic (use --api-key or LLM_API_KEY)"
                        )
                    })?;
                    LlmProvider::Anthropic {
                        api_key: key,
                        model:   model_name
                    }
                }
                Provider::Ollama => LlmProvider::Ollama {
                    base_url: effective_ollama_url,
                    model:    model_name
                }
            };

            let client = LlmClient::with_retry_config(
                llm_provider,
                config.retry.clone(),
                config.llm.effective_max_tokens()
            );

            let template_path = explain_prompt.unwrap_or(config.server.explain_prompt.clone());
            let template = ExplanationTemplate::load(&template_path);

            let state = Arc::new(AppState::new(client, sql_dialect, template));
            server::serve(state, &host, port).await
        }
    }
}
