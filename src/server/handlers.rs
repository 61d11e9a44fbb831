// src/server/handlers.rs
use super::AppState;
use crate::constants::{DEFAULT_ENTRY_LIMIT, MAX_LIST_LIMIT};
use crate::error::AppError;
use crate::model::{Created, Entry, NewEntry, NewProject, PriorityTask, Project};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of `POST /api/entries`.
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub content: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Body of `POST /api/projects`.
#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub deadline: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /: the portal page, or the setup page when no backend is configured.
pub async fn handle_root(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    match state.backend() {
        Ok(backend) => {
            let page = state.pages().portal(backend.kind())?;
            Ok(Html(page).into_response())
        }
        Err(AppError::Configuration(reason)) => {
            let page = state.pages().unavailable(&reason)?;
            Ok((StatusCode::SERVICE_UNAVAILABLE, Html(page)).into_response())
        }
        Err(other) => Err(other),
    }
}

/// POST /api/entries
pub async fn handle_create_entry(
    State(state): State<Arc<AppState>>,
    body: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<Json<Created>, AppError> {
    let backend = state.backend()?;
    let Json(request) = body.map_err(rejected)?;
    let entry = NewEntry::new(request.content, request.tags.unwrap_or_default())?;
    Ok(Json(backend.create_entry(&entry).await?))
}

/// GET /api/entries?limit=N
pub async fn handle_list_entries(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Entry>>, AppError> {
    let backend = state.backend()?;
    let Query(params) = params.map_err(|e| AppError::Validation(e.body_text()))?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_ENTRY_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    Ok(Json(backend.get_entries(limit).await?))
}

/// POST /api/projects
pub async fn handle_create_project(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ProjectRequest>, JsonRejection>,
) -> Result<Json<Created>, AppError> {
    let backend = state.backend()?;
    let Json(request) = body.map_err(rejected)?;
    let project = NewProject::new(request.name, request.description, request.deadline)?;
    Ok(Json(backend.create_project(&project).await?))
}

/// GET /api/projects
pub async fn handle_list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Project>>, AppError> {
    let backend = state.backend()?;
    Ok(Json(backend.get_projects().await?))
}

/// GET /api/priority-task
pub async fn handle_priority_task(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PriorityTask>, AppError> {
    let backend = state.backend()?;
    Ok(Json(backend.get_priority_task().await?))
}

/// GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Every malformed body is a 422, including a wrong content type.
fn rejected(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}
