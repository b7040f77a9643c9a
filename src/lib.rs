pub mod api;
pub mod config;
pub mod db;
pub mod encoding;
pub mod github;

pub use db::DbPool;

use config::Config;
use db::EnvFileStore;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn EnvFileStore>,
    /// Shared connection pool for all outbound GitHub calls.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn EnvFileStore>) -> Self {
        Self {
            config,
            store,
            http: reqwest::Client::new(),
        }
    }
}
