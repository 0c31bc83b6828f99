//! Application state for InkSign API

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::Config;
use crate::locks::DocumentLocks;
use crate::storage::FileStore;

pub struct AppState {
    pub db: SqlitePool,
    pub files: FileStore,
    pub locks: DocumentLocks,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self> {
        tracing::info!("Connecting to database: {}", config.database_url);

        // Every connection to an in-memory database is a separate database
        let max_connections = if config.database_url.contains(":memory:") {
            1
        } else {
            5
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&config.database_url)
            .await
            .with_context(|| format!("connecting to {}", config.database_url))?;

        // Run migrations
        Self::run_migrations(&pool).await?;

        let files = FileStore::open(&config.upload_dir)
            .await
            .with_context(|| format!("creating upload dir {}", config.upload_dir.display()))?;
        tracing::info!("Storing uploads in {}", files.root().display());

        Ok(Self {
            db: pool,
            files,
            locks: DocumentLocks::new(),
            config,
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pdf_records (
                id TEXT PRIMARY KEY,
                filename TEXT NOT NULL,
                file_path TEXT NOT NULL,
                document_hash TEXT NOT NULL,
                size_bytes INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                signed_at TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Listing is newest first
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_pdf_records_created ON pdf_records(created_at)
            "#,
        )
        .execute(pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }
}
