use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

pub type DbPool = SqlitePool;

/// Execute a SQL migration file, properly handling comments
async fn execute_sql(pool: &SqlitePool, sql: &str) -> Result<()> {
    for statement in sql.split(';') {
        // Strip SQL comment lines (lines starting with --)
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = cleaned.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

pub async fn init(data_dir: &Path) -> Result<DbPool> {
    let db_path = data_dir.join("botpad.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    info!("Initializing database at {}", db_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Enable WAL mode for better concurrency
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    info!("Database initialized successfully");
    Ok(pool)
}

/// In-memory database, used by tests. A single connection keeps every
/// query on the same in-memory instance.
pub async fn init_in_memory() -> Result<DbPool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    execute_sql(pool, include_str!("../../migrations/001_env_files.sql")).await?;
    Ok(())
}

/// Persistence for per-(repo, branch) env file blobs.
///
/// Kept behind a trait so the router can be exercised against a fake store.
#[async_trait]
pub trait EnvFileStore: Send + Sync {
    /// Fetch the stored content; a never-written key reads as empty.
    async fn get(&self, repo: &str, branch: &str) -> Result<String, sqlx::Error>;

    /// Replace the stored content and timestamp for the key.
    async fn upsert(&self, repo: &str, branch: &str, content: &str) -> Result<(), sqlx::Error>;
}

pub struct SqliteEnvFileStore {
    pool: DbPool,
}

impl SqliteEnvFileStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnvFileStore for SqliteEnvFileStore {
    async fn get(&self, repo: &str, branch: &str) -> Result<String, sqlx::Error> {
        let content: Option<String> =
            sqlx::query_scalar("SELECT content FROM env_files WHERE repo = ? AND branch = ?")
                .bind(repo)
                .bind(branch)
                .fetch_optional(&self.pool)
                .await?;

        Ok(content.unwrap_or_default())
    }

    async fn upsert(&self, repo: &str, branch: &str, content: &str) -> Result<(), sqlx::Error> {
        let now = chrono::Utc::now().to_rfc3339();

        // Single-statement upsert keeps concurrent writers from losing updates
        sqlx::query(
            r#"
            INSERT INTO env_files (repo, branch, content, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (repo, branch)
            DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at
            "#,
        )
        .bind(repo)
        .bind(branch)
        .bind(content)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
