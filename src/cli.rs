use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// SQL Query Fixer - Correct broken SQL queries with an LLM
#[derive(Parser, Debug)]
#[command(name = "sql-query-fixer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the correction web service
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 8080)]
        port: u16,

        /// LLM provider to use
        #[arg(short = 'P', long, value_enum, default_value = "ollama")]
        provider: Provider,

        /// API key for OpenAI or Anthropic
        #[arg(short, long, env = "LLM_API_KEY")]
        api_key: Option<String>,

        /// Model name
        #[arg(short, long)]
        model: Option<String>,

        /// Ollama base URL
        #[arg(long, default_value = "http://localhost:11434")]
        ollama_url: String,

        /// SQL dialect for DDL parsing and the syntax check
        #[arg(long, value_enum, default_value = "postgresql")]
        dialect: Dialect,

        /// Path to the explanation instruction template
        #[arg(long)]
        explain_prompt: Option<PathBuf>
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Provider {
    OpenAI,
    Anthropic,
    Ollama
}

impl Provider {
    /// Get default model for provider
    pub fn default_model(&self) -> &str {
        match self {
            Self::OpenAI => "gpt-4",
            Self::Anthropic => "claude-sonnet-4-20250514",
            Self::Ollama => "llama3.2"
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Dialect {
    Generic,
    Mysql,
    Postgresql,
    Sqlite
}
