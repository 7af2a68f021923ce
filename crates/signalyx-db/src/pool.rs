//! Connection pool bootstrap and embedded migrations.

use crate::error::Result;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Workspace-level migrations, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Connect to PostgreSQL and apply pending migrations.
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!(max_connections, "database pool ready");
    Ok(pool)
}
