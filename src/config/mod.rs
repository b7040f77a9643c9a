use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default CORS origin when `ALLOWED_ORIGINS` is not configured.
const DEFAULT_ORIGIN: &str = "https://agentcode.pages.dev";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8788
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

/// GitHub App credentials and API endpoint.
///
/// `app_id` and `private_key` are only required for App-mode requests;
/// PAT-mode requests carry their own token.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    #[serde(default)]
    pub app_id: Option<String>,
    /// PKCS8 PEM text of the app's RSA private key.
    #[serde(default)]
    pub private_key: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            private_key: None,
            api_base: default_api_base(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec![DEFAULT_ORIGIN.to_string()]
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&content).with_context(|| "Failed to parse configuration file")?
        } else {
            info!("No config file found, using defaults");
            Config::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables take precedence over the config file so that
    /// secrets never need to live on disk.
    fn apply_env_overrides(&mut self) {
        if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
            let parsed = parse_origin_list(&origins);
            if !parsed.is_empty() {
                self.cors.allowed_origins = parsed;
            }
        }
        if let Ok(app_id) = std::env::var("GITHUB_APP_ID") {
            if !app_id.is_empty() {
                self.github.app_id = Some(app_id);
            }
        }
        if let Ok(key) = std::env::var("GITHUB_APP_PRIVATE_KEY") {
            if !key.is_empty() {
                self.github.private_key = Some(key);
            }
        }
        if let Ok(dir) = std::env::var("BOTPAD_DATA_DIR") {
            if !dir.is_empty() {
                self.server.data_dir = PathBuf::from(dir);
            }
        }
    }
}

/// Split a comma-separated origin list, trimming whitespace around entries.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8788);
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.cors.allowed_origins, vec![DEFAULT_ORIGIN.to_string()]);
        assert!(config.github.app_id.is_none());
    }

    #[test]
    fn test_parse_origin_list() {
        assert_eq!(
            parse_origin_list("https://a.example, https://b.example ,https://c.example"),
            vec![
                "https://a.example".to_string(),
                "https://b.example".to_string(),
                "https://c.example".to_string(),
            ]
        );
        assert!(parse_origin_list("").is_empty());
        assert!(parse_origin_list(" , ").is_empty());
    }

    #[test]
    fn test_parse_toml_sections() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000

            [github]
            app_id = "12345"

            [cors]
            allowed_origins = ["https://pad.example"]
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.github.app_id.as_deref(), Some("12345"));
        assert_eq!(config.cors.allowed_origins, vec!["https://pad.example"]);
        // Unspecified sections fall back to defaults
        assert_eq!(config.logging.level, "info");
    }
}
