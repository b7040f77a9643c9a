//! GitHub integration module.
//!
//! This module provides:
//! - JWT signing for GitHub App authentication
//! - Installation access token exchange
//! - The per-request API client bound to one repository and bearer token

pub mod api_client;
pub mod token_manager;

pub use api_client::GitHubClient;

use crate::api::error::ApiError;
use crate::config::GitHubConfig;

/// How a request authenticates against GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// GitHub App installation token, exchanged fresh per request.
    App,
    /// User-supplied personal access token.
    Pat,
}

impl AuthMode {
    /// The literal `"pat"` (any case, surrounding whitespace ignored)
    /// selects PAT mode; everything else, including the empty string,
    /// selects App mode.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("pat") {
            Self::Pat
        } else {
            Self::App
        }
    }
}

/// Produce a client bound to `repo` and a bearer token for the given mode.
///
/// PAT mode wraps the caller's token verbatim and fails fast when it is
/// empty. App mode signs an app JWT from the configured secrets and
/// exchanges it for an installation token before binding.
pub async fn get_client(
    http: &reqwest::Client,
    config: &GitHubConfig,
    mode: AuthMode,
    repo: &str,
    pat: &str,
) -> Result<GitHubClient, ApiError> {
    match mode {
        AuthMode::Pat => {
            if pat.is_empty() {
                return Err(ApiError::config("Token required for PAT mode"));
            }
            Ok(GitHubClient::new(
                http.clone(),
                &config.api_base,
                repo,
                pat.to_string(),
            ))
        }
        AuthMode::App => {
            let (app_id, private_key) = match (&config.app_id, &config.private_key) {
                (Some(id), Some(key)) if !id.is_empty() && !key.is_empty() => (id, key),
                _ => return Err(ApiError::config("App secrets missing")),
            };

            let jwt = token_manager::sign_app_jwt(app_id, private_key)?;
            let token =
                token_manager::fetch_installation_token(http, &config.api_base, &jwt, repo)
                    .await?;

            Ok(GitHubClient::new(
                http.clone(),
                &config.api_base,
                repo,
                token,
            ))
        }
    }
}
