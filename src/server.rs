//! Web surface: the correction form and its JSON API.
//!
//! One router serves the embedded single-page form and three endpoints:
//!
//! - `POST /api/schema` replaces the session schema from uploaded DDL
//! - `POST /api/fix` runs correction, syntax check, and explanation
//! - `GET /api/session` returns the schema and the last input/output pair
//!
//! Each fix action is fully synchronous: at most two sequential completion
//! calls with the local syntax check in between. Endpoint failures never
//! abort the interaction; they degrade to advisory text inside the result
//! fields, so the user can always inspect what happened and resubmit.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post}
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use crate::{
    check::is_valid_syntax,
    error::{AppResult, server_error},
    llm::LlmClient,
    prompt::ExplanationTemplate,
    schema::{Schema, SqlDialect}
};

/// Shared application state
pub struct AppState {
    pub client:   LlmClient,
    pub dialect:  SqlDialect,
    pub template: ExplanationTemplate,
    pub session:  RwLock<Session>
}

pub type SharedState = Arc<AppState>;

/// Per-display-session cache: the active schema and the last corrected pair.
///
/// A new upload replaces the schema wholesale; a new fix action overwrites
/// the input/output pair. Last write wins, one in-flight action at a time.
#[derive(Debug, Default)]
pub struct Session {
    pub schema:      Schema,
    pub last_input:  String,
    pub last_output: String
}

impl AppState {
    pub fn new(client: LlmClient, dialect: SqlDialect, template: ExplanationTemplate) -> Self {
        Self {
            client,
            dialect,
            template,
            session: RwLock::new(Session::default())
        }
    }
}

/// Build the application router
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/schema", post(upload_schema))
        .route("/api/session", get(session_info))
        .route("/api/fix", post(fix_query))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: SharedState, host: &str, port: u16) -> AppResult<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| server_error(format!("Failed to bind {}: {}", addr, e)))?;
    tracing::info!("sql-query-fixer listening on http://{}", addr);
    axum::serve(listener, router(state))
        .await
        .map_err(|e| server_error(format!("Server error: {}", e)))
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

#[derive(Deserialize)]
struct SchemaUpload {
    ddl: String
}

#[derive(Serialize)]
struct SchemaResponse {
    parsed:      bool,
    table_count: usize,
    tables:      IndexMap<String, Vec<String>>
}

/// Replace the session schema with tables extracted from uploaded DDL.
///
/// Unparseable DDL is not an error: the session proceeds schema-less and the
/// response carries `parsed: false` so the page can show an advisory.
async fn upload_schema(
    State(state): State<SharedState>,
    Json(upload): Json<SchemaUpload>
) -> Json<SchemaResponse> {
    let schema = Schema::from_ddl(&upload.ddl, state.dialect);
    let response = SchemaResponse {
        parsed:      !schema.is_empty(),
        table_count: schema.len(),
        tables:      schema.tables.clone()
    };
    state.session.write().await.schema = schema;
    Json(response)
}

#[derive(Serialize)]
struct SessionResponse {
    tables:      IndexMap<String, Vec<String>>,
    last_input:  String,
    last_output: String
}

async fn session_info(State(state): State<SharedState>) -> Json<SessionResponse> {
    let session = state.session.read().await;
    Json(SessionResponse {
        tables:      session.schema.tables.clone(),
        last_input:  session.last_input.clone(),
        last_output: session.last_output.clone()
    })
}

#[derive(Deserialize)]
struct FixRequest {
    sql: String
}

#[derive(Serialize)]
struct FixResponse {
    corrected_sql: String,
    syntax_valid:  bool,
    explanation:   String
}

/// Run the full correction sequence for one query.
///
/// Endpoint failures are reported in the result channel rather than as HTTP
/// errors: the corrected-SQL field carries an error description and the rest
/// of the sequence still runs against it.
async fn fix_query(
    State(state): State<SharedState>,
    Json(request): Json<FixRequest>
) -> Result<Json<FixResponse>, (StatusCode, String)> {
    if request.sql.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            String::from("Please enter a SQL query to fix.")
        ));
    }

    let schema = state.session.read().await.schema.clone();

    let corrected_sql = match state.client.fix_sql(&request.sql, &schema).await {
        Ok(sql) => sql,
        Err(e) => {
            tracing::warn!("correction call failed: {e}");
            format!("Error: Could not fix query. {}", e)
        }
    };

    let syntax_valid = is_valid_syntax(&corrected_sql, state.dialect);

    let explanation = match state
        .client
        .explain_fix(&request.sql, &corrected_sql, &state.template)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("explanation call failed: {e}");
            format!("Could not generate explanation: {}", e)
        }
    };

    {
        let mut session = state.session.write().await;
        session.last_input = request.sql.clone();
        session.last_output = corrected_sql.clone();
    }

    Ok(Json(FixResponse {
        corrected_sql,
        syntax_valid,
        explanation
    }))
}
