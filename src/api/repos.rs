//! Repository connection and tree listing endpoints.

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::github::{self, AuthMode};
use crate::AppState;

use super::error::ApiError;
use super::extract::Json;
use super::validation::validate_repo;

fn default_branch() -> String {
    "main".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub token: String,
}

/// Validate a repository and report its default branch.
///
/// POST /api/connect
pub async fn connect(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConnectRequest>,
) -> Result<Json<Value>, ApiError> {
    let repo = req.repo.trim();
    validate_repo(repo)?;

    let mode = AuthMode::parse(&req.mode);
    let gh = github::get_client(&state.http, &state.config.github, mode, repo, req.token.trim())
        .await?;

    let meta = gh.get("", &[]).await?;
    let branch = meta
        .get("default_branch")
        .and_then(Value::as_str)
        .unwrap_or("main")
        .to_string();

    info!(repo = %repo, branch = %branch, "Repository connected");

    Ok(Json(json!({ "branch": branch })))
}

#[derive(Debug, Deserialize)]
pub struct TreeQuery {
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub token: String,
}

/// Recursive file listing for a branch: ref -> commit -> tree.
///
/// GET /api/tree
pub async fn tree(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TreeQuery>,
) -> Result<Json<Value>, ApiError> {
    validate_repo(&query.repo)?;
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

    let git_ref = gh.get(&format!("git/refs/heads/{}", branch), &[]).await?;
    let commit_sha = git_ref
        .pointer("/object/sha")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::decode("Branch ref has no commit sha"))?
        .to_string();

    let commit = gh.get(&format!("git/commits/{}", commit_sha), &[]).await?;
    let tree_sha = commit
        .pointer("/tree/sha")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::decode("Commit has no tree sha"))?
        .to_string();

    let listing = gh
        .get(&format!("git/trees/{}", tree_sha), &[("recursive", "1")])
        .await?;
    let entries = listing.get("tree").cloned().unwrap_or_else(|| json!([]));

    Ok(Json(json!({ "branch": branch, "tree": entries })))
}
