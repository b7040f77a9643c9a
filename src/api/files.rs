//! File content endpoints: read, commit (create/update), delete.
//!
//! Writes go through GitHub's contents API with the caller-supplied blob
//! SHA for optimistic concurrency; a stale SHA surfaces GitHub's conflict
//! status unchanged.

use axum::extract::{Query, State};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::encoding;
use crate::github::{self, AuthMode};
use crate::AppState;

use super::error::ApiError;
use super::extract::Json;
use super::validation::validate_repo;

fn default_branch() -> String {
    "main".to_string()
}

fn default_commit_message() -> String {
    "Update".to_string()
}

fn default_delete_message() -> String {
    "Delete".to_string()
}

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub token: String,
}

/// Fetch and decode one file at a branch.
///
/// GET /api/file
pub async fn read_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> Result<Json<Value>, ApiError> {
    validate_repo(&query.repo)?;
    if query.path.is_empty() {
        return Err(ApiError::validation("Path required"));
    }
    let branch = if query.branch.is_empty() {
        default_branch()
    } else {
        query.branch
    };

    let mode = AuthMode::parse(&query.mode);
    let gh = github::get_client(
        &state.http,
        &state.config.github,
        mode,
        &query.repo,
        &query.token,
    )
    .await?;

    let file = gh
        .get(
            &format!("contents/{}", query.path),
            &[("ref", branch.as_str())],
        )
        .await?;

    let sha = file
        .get("sha")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let content = match file.get("content").and_then(Value::as_str) {
        Some(encoded) if !encoded.is_empty() => {
            encoding::from_base64(encoded).map_err(|e| ApiError::decode(e.to_string()))?
        }
        _ => String::new(),
    };

    Ok(Json(json!({ "path": query.path, "sha": sha, "content": content })))
}

#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_commit_message")]
    pub message: String,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub token: String,
}

/// Create or update a file. Omitting `sha` creates; supplying one updates
/// against that blob. GitHub's response is returned verbatim.
///
/// POST /api/commit
pub async fn commit_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CommitRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_repo(&req.repo)?;
    if req.path.is_empty() {
        return Err(ApiError::validation("Path required"));
    }

    let mode = AuthMode::parse(&req.mode);
    let gh = github::get_client(&state.http, &state.config.github, mode, &req.repo, &req.token)
        .await?;

    let mut body = json!({
        "message": req.message,
        "content": encoding::to_base64(&req.content),
        "branch": req.branch,
    });
    if let Some(sha) = req.sha.as_deref().filter(|s| !s.is_empty()) {
        body["sha"] = json!(sha);
    }

    let out = gh
        .request(
            Method::PUT,
            &format!("contents/{}", req.path),
            &[],
            Some(&body),
        )
        .await?;

    info!(repo = %req.repo, branch = %req.branch, path = %req.path, "File committed");

    Ok(Json(out))
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub sha: String,
    #[serde(default = "default_delete_message")]
    pub message: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub token: String,
}

/// Delete a file at its current blob SHA.
///
/// POST /api/delete
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_repo(&req.repo)?;
    if req.path.is_empty() || req.sha.is_empty() {
        return Err(ApiError::validation("Path and sha required"));
    }

    let mode = AuthMode::parse(&req.mode);
    let gh = github::get_client(&state.http, &state.config.github, mode, &req.repo, &req.token)
        .await?;

    let body = json!({
        "message": req.message,
        "branch": req.branch,
        "sha": req.sha,
    });

    let out = gh
        .request(
            Method::DELETE,
            &format!("contents/{}", req.path),
            &[],
            Some(&body),
        )
        .await?;

    info!(repo = %req.repo, branch = %req.branch, path = %req.path, "File deleted");

    Ok(Json(out))
}
