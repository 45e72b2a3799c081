use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id              SERIAL PRIMARY KEY,
        title           VARCHAR(255) NOT NULL,
        company         VARCHAR(255) NOT NULL,
        location        VARCHAR(255),
        experience      VARCHAR(100),
        education       VARCHAR(100),
        salary_range    VARCHAR(100),
        job_url         VARCHAR(512) NOT NULL UNIQUE,
        source_website  VARCHAR(50),
        posting_date    VARCHAR(50),
        industry        VARCHAR(255),
        job_description TEXT,
        status          VARCHAR(20) NOT NULL DEFAULT 'unfollowed',
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS jobs_posting_order_idx ON jobs (posting_date DESC, id DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS metadata (
        meta_key   VARCHAR(50) PRIMARY KEY,
        meta_value VARCHAR(255)
    )
    "#,
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the `jobs` and `metadata` tables if they do not exist yet.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to initialize database schema")?;
    }
    info!("Database schema ready");
    Ok(())
}
