use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const SCHEMA: &str = include_str!("../migrations/0001_init.sql");

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

/// Applies the schema. Every statement is idempotent, so this runs on each start.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in schema_statements() {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}

fn schema_statements() -> impl Iterator<Item = &'static str> {
    SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty())
}
