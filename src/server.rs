//! Axum route handlers for the mnemo REST API.
//!
//! Thin adapter over the core archive operations, mirroring the CLI
//! surface. Default: http://127.0.0.1:5001/

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use mnemo_core::archive::entry::TIMESTAMP_FORMAT;
use mnemo_core::archive::Archive;
use mnemo_core::error::{MnemoError, Result};
use mnemo_core::rules::{RulesStore, DEFAULT_BASE};
use mnemo_core::search::{ScoredResult, SearchEngine};

use crate::commands::search::text_banner;

pub struct AppState {
    pub archive: Archive,
}

/// Bind and serve until ctrl-c.
pub async fn run(archive: Archive, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState { archive });

    let addr = format!("{}:{}", host, port);
    tracing::info!(%addr, "REST server starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/search", get(search))
        .route("/quick-search", get(quick_search))
        .route("/add", post(add))
        .route("/rules", get(get_rules).post(post_rule))
        .route("/generate-cursorrules", post(generate_cursorrules))
        .route("/list-projects", get(list_projects))
        .route("/list-sections", get(list_sections))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install ctrl-c handler");
    }
}

/// Map a core error onto an HTTP status plus the JSON error envelope.
fn error_response(err: &MnemoError) -> (StatusCode, Json<Value>) {
    let status = match err {
        MnemoError::UnknownFormat(_)
        | MnemoError::Usage(_)
        | MnemoError::EmptyField { .. }
        | MnemoError::InvalidName { .. } => StatusCode::BAD_REQUEST,

        MnemoError::ProjectNotFound { .. } => StatusCode::NOT_FOUND,

        MnemoError::Busy { .. } => StatusCode::SERVICE_UNAVAILABLE,

        MnemoError::InvalidConfig { .. }
        | MnemoError::RulesParse { .. }
        | MnemoError::Io(_)
        | MnemoError::Json(_)
        | MnemoError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err.to_json()))
}

// GET /ping
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "mnemo REST API is running" }))
}

#[derive(Deserialize)]
struct SearchParams {
    query: Option<String>,
    project: Option<String>,
    format: Option<String>,
}

// GET /search
async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    respond_search(&state, &params, "json")
}

// GET /quick-search
async fn quick_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    respond_search(&state, &params, "text")
}

fn respond_search(state: &AppState, params: &SearchParams, default_format: &str) -> Response {
    let query = params.query.as_deref().unwrap_or("");

    match SearchEngine::new(&state.archive).search(query, params.project.as_deref()) {
        Ok(results) => {
            let format = params.format.as_deref().unwrap_or(default_format);
            if format == "text" {
                text_banner(query, &results).into_response()
            } else {
                json_results(query, &results).into_response()
            }
        }
        Err(err) => error_response(&err).into_response(),
    }
}

fn json_results(query: &str, results: &[ScoredResult]) -> Json<Value> {
    Json(json!({
        "query": query,
        "count": results.len(),
        "results": results,
    }))
}

#[derive(Deserialize)]
struct AddBody {
    project: String,
    section: String,
    title: Option<String>,
    content: String,
}

// POST /add
async fn add(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddBody>,
) -> (StatusCode, Json<Value>) {
    let title = body
        .title
        .unwrap_or_else(|| format!("Entry on {}", chrono::Local::now().format(TIMESTAMP_FORMAT)));

    match state
        .archive
        .add(&body.project, &body.section, &title, &body.content)
    {
        Ok(location) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": "Content added to archives",
                "file": location.file,
            })),
        ),
        Err(err) => error_response(&err),
    }
}

// GET /rules
async fn get_rules(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match RulesStore::new(&state.archive).get_rules() {
        Ok(rules) => (
            StatusCode::OK,
            Json(json!({ "count": rules.len(), "rules": rules })),
        ),
        Err(err) => error_response(&err),
    }
}

#[derive(Deserialize)]
struct RuleBody {
    name: String,
    content: String,
}

// POST /rules
async fn post_rule(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RuleBody>,
) -> (StatusCode, Json<Value>) {
    match RulesStore::new(&state.archive).set_rule(&body.name, &body.content) {
        Ok(path) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": format!("Rule '{}' updated", body.name),
                "file": path,
            })),
        ),
        Err(err) => error_response(&err),
    }
}

#[derive(Deserialize)]
struct GenerateBody {
    output_path: Option<String>,
}

// POST /generate-cursorrules
async fn generate_cursorrules(
    State(state): State<Arc<AppState>>,
    body: Option<Json<GenerateBody>>,
) -> (StatusCode, Json<Value>) {
    let store = RulesStore::new(&state.archive);
    let output_path = body.and_then(|Json(b)| b.output_path);

    let result = match output_path {
        Some(path) => store.generate(None, Path::new(&path)).map(|file| {
            json!({
                "status": "success",
                "message": "Generated combined cursorrules file",
                "file": file,
            })
        }),
        None => store
            .render_merged(DEFAULT_BASE)
            .map(|document| json!({ "status": "success", "document": document })),
    };

    match result {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(err) => error_response(&err),
    }
}

// GET /list-projects
async fn list_projects(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match state.archive.list_projects() {
        Ok(projects) => (
            StatusCode::OK,
            Json(json!({ "count": projects.len(), "projects": projects })),
        ),
        Err(err) => error_response(&err),
    }
}

#[derive(Deserialize)]
struct SectionsParams {
    project: Option<String>,
}

// GET /list-sections
async fn list_sections(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SectionsParams>,
) -> (StatusCode, Json<Value>) {
    let sections = match params.project.as_deref() {
        None | Some("") => Err(MnemoError::EmptyField { field: "project" }),
        Some(project) => state.archive.list_sections(project),
    };

    match sections {
        Ok(sections) => (
            StatusCode::OK,
            Json(json!({
                "project": params.project,
                "count": sections.len(),
                "sections": sections,
            })),
        ),
        Err(err) => error_response(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        let (status, _) = error_response(&MnemoError::EmptyField { field: "query" });
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = error_response(&MnemoError::Usage("bad flag".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_project_maps_to_not_found() {
        let err = MnemoError::ProjectNotFound {
            project: "ghost".to_string(),
        };
        let (status, Json(body)) = error_response(&err);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "not_found");
    }

    #[test]
    fn test_locked_section_maps_to_service_unavailable() {
        let err = MnemoError::Busy {
            project: "frontend".to_string(),
            section: "errors".to_string(),
        };
        let (status, _) = error_response(&err);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_internal_errors_carry_envelope() {
        let (status, Json(body)) = error_response(&MnemoError::Other("boom".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "boom");
        assert_eq!(body["error"]["code"], 1);
    }
}
