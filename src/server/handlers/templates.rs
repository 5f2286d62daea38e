//! Template CRUD handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::template::Template;

use super::super::state::AppState;
use super::error_response;

/// GET /api - Service banner.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Certificate Generator API" }))
}

/// GET /api/templates - List saved templates.
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Template>>, (StatusCode, String)> {
    state
        .store
        .list_templates()
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/templates - Save a new template. Any `id` in the body is ignored.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(template): Json<Template>,
) -> Result<Json<Template>, (StatusCode, String)> {
    let stored = state
        .store
        .create_template(template)
        .await
        .map_err(error_response)?;
    tracing::info!(id = stored.id.as_deref().unwrap_or_default(), name = %stored.name, "Template created");
    Ok(Json(stored))
}

/// GET /api/templates/:id - Fetch one template.
pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Template>, (StatusCode, String)> {
    state
        .store
        .get_template(&id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// DELETE /api/templates/:id - Delete a template.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    state
        .store
        .delete_template(&id)
        .await
        .map_err(error_response)?;
    tracing::info!(id = %id, "Template deleted");
    Ok(Json(json!({ "message": "Template deleted successfully" })))
}
