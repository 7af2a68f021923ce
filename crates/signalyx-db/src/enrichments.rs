//! Enrichment-job repository.

use crate::error::{DbError, Result};
use crate::schema::EnrichmentJob;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct EnrichmentJobRepository {
    pool: PgPool,
}

impl EnrichmentJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, target_kind: &str, target_id: Uuid) -> Result<EnrichmentJob> {
        let row = sqlx::query_as::<_, EnrichmentJob>(
            "INSERT INTO enrichment_jobs (target_kind, target_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(target_kind)
        .bind(target_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EnrichmentJob>> {
        let row = sqlx::query_as::<_, EnrichmentJob>("SELECT * FROM enrichment_jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn mark_processing(&self, id: Uuid, agent_task_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE enrichment_jobs
            SET status = 'processing', agent_task_id = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(agent_task_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn mark_completed(&self, id: Uuid, result: &serde_json::Value) -> Result<EnrichmentJob> {
        let row = sqlx::query_as::<_, EnrichmentJob>(
            r#"
            UPDATE enrichment_jobs
            SET status = 'completed', result = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(result)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| DbError::NotFound(format!("enrichment job {id}")))
    }

    pub async fn mark_failed(&self, id: Uuid, error: &str) -> Result<()> {
        sqlx::query(
            "UPDATE enrichment_jobs SET status = 'failed', error = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
