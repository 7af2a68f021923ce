//! Scan repository.
//!
//! A scan row is the poll target for the SPA: the launching handler
//! inserts it as `pending`, the pipeline moves it through `processing`
//! to `completed`/`failed`, and the client re-fetches it on an interval.

use crate::error::{DbError, Result};
use crate::schema::{Scan, ScanKind};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ScanRepository {
    pool: PgPool,
}

impl ScanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, kind: ScanKind, params: &serde_json::Value) -> Result<Scan> {
        let row = sqlx::query_as::<_, Scan>(
            "INSERT INTO scans (kind, params) VALUES ($1, $2) RETURNING *",
        )
        .bind(kind.to_string())
        .bind(params)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Scan>> {
        let row = sqlx::query_as::<_, Scan>("SELECT * FROM scans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<Scan>> {
        let rows = sqlx::query_as::<_, Scan>("SELECT * FROM scans ORDER BY created_at DESC LIMIT $1")
            .bind(limit.clamp(1, 100))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn mark_processing(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE scans SET status = 'processing', started_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn mark_completed(
        &self,
        id: Uuid,
        found: i32,
        inserted: i32,
        duplicates: i32,
    ) -> Result<Scan> {
        let row = sqlx::query_as::<_, Scan>(
            r#"
            UPDATE scans SET
                status = 'completed',
                signals_found = $2,
                signals_inserted = $3,
                duplicates_skipped = $4,
                finished_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(found)
        .bind(inserted)
        .bind(duplicates)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| DbError::NotFound(format!("scan {id}")))
    }

    pub async fn mark_failed(&self, id: Uuid, error: &str) -> Result<()> {
        sqlx::query(
            "UPDATE scans SET status = 'failed', error = $2, finished_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
