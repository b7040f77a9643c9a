//! Per-repo/per-branch env file persistence.
//!
//! These are opaque text blobs the editor keeps alongside a branch, not
//! process environment variables. Reads of never-written keys answer empty
//! content rather than an error.

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::AppState;

use super::error::ApiError;
use super::extract::Json;
use super::validation::validate_repo;

fn default_branch() -> String {
    "main".to_string()
}

#[derive(Debug, Deserialize)]
pub struct EnvQuery {
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

/// GET /api/env
pub async fn get_env(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EnvQuery>,
) -> Result<Json<Value>, ApiError> {
    validate_repo(&query.repo)?;

    let content = state.store.get(&query.repo, &query.branch).await?;
    Ok(Json(json!({ "content": content })))
}

#[derive(Debug, Deserialize)]
pub struct SetEnvRequest {
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default)]
    pub content: String,
}

/// POST /api/env
pub async fn set_env(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetEnvRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_repo(&req.repo)?;

    state
        .store
        .upsert(&req.repo, &req.branch, &req.content)
        .await?;

    info!(repo = %req.repo, branch = %req.branch, bytes = req.content.len(), "Env file saved");

    Ok(Json(json!({ "ok": true })))
}
