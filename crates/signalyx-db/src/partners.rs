//! Partner repository.

use crate::error::{DbError, Result};
use crate::schema::Partner;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewPartner {
    pub name: String,
    pub category: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct PartnerPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct PartnerRepository {
    pool: PgPool,
}

impl PartnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, new: &NewPartner) -> Result<Partner> {
        let row = sqlx::query_as::<_, Partner>(
            r#"
            INSERT INTO partners (name, category, contact_name, email, notes)
            VALUES ($1,$2,$3,$4,$5)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.category)
        .bind(&new.contact_name)
        .bind(&new.email)
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Partner>> {
        let row = sqlx::query_as::<_, Partner>("SELECT * FROM partners WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list(&self, status: Option<&str>, limit: i64, offset: i64) -> Result<Vec<Partner>> {
        let rows = sqlx::query_as::<_, Partner>(
            r#"
            SELECT * FROM partners
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(limit.clamp(1, 500))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update(&self, id: Uuid, patch: &PartnerPatch) -> Result<Partner> {
        let row = sqlx::query_as::<_, Partner>(
            r#"
            UPDATE partners SET
                name         = COALESCE($2, name),
                category     = COALESCE($3, category),
                contact_name = COALESCE($4, contact_name),
                email        = COALESCE($5, email),
                status       = COALESCE($6, status),
                notes        = COALESCE($7, notes),
                updated_at   = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.category)
        .bind(&patch.contact_name)
        .bind(&patch.email)
        .bind(&patch.status)
        .bind(&patch.notes)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| DbError::NotFound(format!("partner {id}")))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM partners WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
