//! Database schema extraction from DDL.
//!
//! This module parses SQL DDL (`CREATE TABLE` statements) into an ordered
//! mapping of table names to column names, used to give the LLM enough context
//! to resolve table and column typos in broken queries.
//!
//! # Behavior
//!
//! - Only `CREATE TABLE` statements contribute to the schema; `ALTER TABLE`,
//!   `CREATE INDEX` and everything else is silently ignored.
//! - Duplicate table names overwrite: the later definition wins.
//! - Column names keep declaration order and are not de-duplicated.
//!
//! # Example
//!
//! ```
//! use sql_query_fixer::schema::{Schema, SqlDialect};
//!
//! let ddl = r#"
//!     CREATE TABLE users (
//!         id INT PRIMARY KEY,
//!         email VARCHAR(255) NOT NULL
//!     );
//! "#;
//!
//! let schema = Schema::parse(ddl, SqlDialect::default()).unwrap();
//! assert_eq!(schema.tables["users"], vec!["id", "email"]);
//! ```

use indexmap::IndexMap;
use sqlparser::{
    dialect::{Dialect, GenericDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect},
    parser::Parser
};

use crate::error::{AppResult, schema_parse_error};

/// SQL dialect for parsing
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub enum SqlDialect {
    Generic,
    MySQL,
    #[default]
    PostgreSQL,
    SQLite
}

impl SqlDialect {
    /// Convert to sqlparser dialect for parsing
    pub fn into_parser_dialect(self) -> Box<dyn Dialect> {
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::MySQL => Box::new(MySqlDialect {}),
            Self::PostgreSQL => Box::new(PostgreSqlDialect {}),
            Self::SQLite => Box::new(SQLiteDialect {})
        }
    }
}

/// Extracted database schema: table name mapped to ordered column names.
///
/// Tables are stored in an `IndexMap` so the serialized prompt context keeps
/// a stable, insertion-based order.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    /// Map of table name to its column names in declaration order
    pub tables: IndexMap<String, Vec<String>>
}

impl Schema {
    /// Parse DDL text with the specified dialect
    ///
    /// # Errors
    ///
    /// Returns error if the document fails to parse. There is no partial
    /// success: a parse error anywhere discards all statements.
    pub fn parse(sql: &str, dialect: SqlDialect) -> AppResult<Self> {
        let parser_dialect = dialect.into_parser_dialect();
        let statements = Parser::parse_sql(parser_dialect.as_ref(), sql)
            .map_err(|e| schema_parse_error(e.to_string()))?;
        let mut schema = Self::default();
        for stmt in statements {
            if let sqlparser::ast::Statement::CreateTable(create) = stmt {
                let columns = create
                    .columns
                    .iter()
                    .map(|column| column.name.to_string())
                    .collect();
                // Later definition wins for duplicate table names
                schema.tables.insert(create.name.to_string(), columns);
            }
        }
        Ok(schema)
    }

    /// Parse DDL leniently: any parse failure yields an empty schema.
    ///
    /// This is the entry point used by the upload flow. Callers cannot tell
    /// "no schema provided" from "schema failed to parse"; both mean the
    /// correction prompt is built without schema context.
    pub fn from_ddl(sql: &str, dialect: SqlDialect) -> Self {
        match Self::parse(sql, dialect) {
            Ok(schema) => schema,
            Err(e) => {
                tracing::warn!("schema DDL did not parse, proceeding without schema: {e}");
                Self::default()
            }
        }
    }

    /// Whether the schema contains no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Number of tables in the schema
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Serialize the schema as indented JSON for embedding in a prompt
    pub fn to_context(&self) -> String {
        serde_json::to_string_pretty(&self.tables).unwrap_or_default()
    }
}
