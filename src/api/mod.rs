mod env_files;
pub mod error;
mod extract;
mod files;
mod repos;
mod validation;

pub use error::ApiError;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/connect", post(repos::connect))
        .route("/tree", get(repos::tree))
        .route("/file", get(files::read_file))
        .route("/commit", post(files::commit_file))
        .route("/delete", post(files::delete_file))
        .route("/env", get(env_files::get_env).post(env_files::set_env));

    let cors = cors_layer(&state.config.cors.allowed_origins);

    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        // CORS outermost so preflights never reach routing
        .layer(cors)
        .with_state(state)
}

async fn index() -> &'static str {
    "BotPad API is running"
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Origin-allow-listed CORS. The allow-origin header is reflected only for
/// listed origins; the browser is the enforcement point for everyone else.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-pat"),
        ])
        .max_age(Duration::from_secs(86_400))
}
