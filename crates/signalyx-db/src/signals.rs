//! Signal repository.
//!
//! Signals are the core entity: company events surfaced by scans or
//! entered by hand, tracked through the outreach pipeline via `status`.

use crate::error::{DbError, Result};
use crate::schema::{NewSignal, Signal, SignalStatus};
use sqlx::PgPool;
use uuid::Uuid;

/// Filters accepted by [`SignalRepository::list`].
#[derive(Debug, Default, Clone)]
pub struct SignalFilter {
    pub status: Option<String>,
    pub kind: Option<String>,
    pub origin: Option<String>,
    /// Case-insensitive substring match on the company name.
    pub company: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Partial update payload; `None` fields are left untouched.
#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct SignalPatch {
    pub company_name: Option<String>,
    pub siren: Option<String>,
    pub kind: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub source_url: Option<String>,
    pub published_on: Option<chrono::NaiveDate>,
    pub status: Option<String>,
}

#[derive(Clone)]
pub struct SignalRepository {
    pool: PgPool,
}

impl SignalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, new: &NewSignal) -> Result<Signal> {
        let row = sqlx::query_as::<_, Signal>(
            r#"
            INSERT INTO signals
                (company_name, siren, kind, title, summary, origin,
                 source_url, published_on, dedup_hash)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
            RETURNING *
            "#,
        )
        .bind(&new.company_name)
        .bind(&new.siren)
        .bind(new.kind.to_string())
        .bind(&new.title)
        .bind(&new.summary)
        .bind(new.origin.to_string())
        .bind(&new.source_url)
        .bind(new.published_on)
        .bind(new.dedup_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Signal>> {
        let row = sqlx::query_as::<_, Signal>("SELECT * FROM signals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list(&self, filter: &SignalFilter) -> Result<Vec<Signal>> {
        let limit = filter.limit.clamp(1, 500);
        let rows = sqlx::query_as::<_, Signal>(
            r#"
            SELECT * FROM signals
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR kind = $2)
              AND ($3::text IS NULL OR origin = $3)
              AND ($4::text IS NULL OR company_name ILIKE '%' || $4 || '%')
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(&filter.status)
        .bind(&filter.kind)
        .bind(&filter.origin)
        .bind(&filter.company)
        .bind(limit)
        .bind(filter.offset.max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update(&self, id: Uuid, patch: &SignalPatch) -> Result<Signal> {
        let row = sqlx::query_as::<_, Signal>(
            r#"
            UPDATE signals SET
                company_name = COALESCE($2, company_name),
                siren        = COALESCE($3, siren),
                kind         = COALESCE($4, kind),
                title        = COALESCE($5, title),
                summary      = COALESCE($6, summary),
                source_url   = COALESCE($7, source_url),
                published_on = COALESCE($8, published_on),
                status       = COALESCE($9, status),
                updated_at   = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.company_name)
        .bind(&patch.siren)
        .bind(&patch.kind)
        .bind(&patch.title)
        .bind(&patch.summary)
        .bind(&patch.source_url)
        .bind(patch.published_on)
        .bind(&patch.status)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| DbError::NotFound(format!("signal {id}")))
    }

    pub async fn set_status(&self, id: Uuid, status: SignalStatus) -> Result<Signal> {
        let row = sqlx::query_as::<_, Signal>(
            "UPDATE signals SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| DbError::NotFound(format!("signal {id}")))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM signals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Dedup gate used by the scan pipeline.
    pub async fn hash_exists(&self, hash: i64) -> Result<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1::bigint FROM signals WHERE dedup_hash = $1 LIMIT 1")
                .bind(hash)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<Signal>> {
        let rows =
            sqlx::query_as::<_, Signal>("SELECT * FROM signals ORDER BY created_at DESC LIMIT $1")
                .bind(limit.clamp(1, 100))
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn counts_by_status(&self) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM signals GROUP BY status")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn counts_by_kind(&self) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT kind, COUNT(*) FROM signals GROUP BY kind")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }
}
