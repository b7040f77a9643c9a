//! GitHub API client bound to a single repository and bearer token.
//!
//! One client is built per inbound request by [`super::get_client`] and
//! dropped afterwards; it never caches tokens across requests.

use reqwest::{Method, Url};
use serde_json::Value;

use crate::api::error::ApiError;

/// User-Agent sent on every GitHub call. GitHub rejects requests without one.
pub const USER_AGENT: &str = "botpad";

pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    repo: String,
    token: String,
}

impl GitHubClient {
    pub fn new(http: reqwest::Client, api_base: &str, repo: &str, token: String) -> Self {
        Self {
            http,
            api_base: api_base.to_string(),
            repo: repo.to_string(),
            token,
        }
    }

    /// The bearer token this client is bound to.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// GET a path under the bound repository, e.g. `git/refs/heads/main`.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.request(Method::GET, path, query, None).await
    }

    /// Issue a request against `{api_base}/repos/{repo}/{path}` with the
    /// standard GitHub headers, returning the parsed JSON body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = self.build_url(path, query)?;

        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        execute(builder, &self.token).await
    }

    /// Build the request URL, percent-encoding every path segment and query
    /// value. File paths may contain `#` or `?`, which are legal URL
    /// metacharacters; interpolating them raw would truncate the path or
    /// bleed it into the query string.
    fn build_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| ApiError::config(format!("Invalid GitHub API base URL: {}", e)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::config("Invalid GitHub API base URL"))?;
            segments.pop_if_empty();
            segments.push("repos");
            for segment in self.repo.split('/') {
                segments.push(segment);
            }
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }
}

/// Send a request with GitHub's standard headers and parse the body as JSON.
///
/// The body is parsed before the status check so upstream failures carry
/// GitHub's structured error detail, not just a status line.
pub(crate) async fn execute(
    builder: reqwest::RequestBuilder,
    token: &str,
) -> Result<Value, ApiError> {
    let response = builder
        .header("Authorization", format!("Bearer {}", token))
        .header("Accept", "application/vnd.github+json")
        .header("User-Agent", USER_AGENT)
        .send()
        .await?;

    let status = response.status().as_u16();
    let bytes = response.bytes().await?;

    let body: Value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    if !(200..300).contains(&status) {
        return Err(ApiError::upstream(status, body));
    }

    Ok(body)
}
