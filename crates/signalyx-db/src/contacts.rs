//! Contact repository.

use crate::error::{DbError, Result};
use crate::schema::{Contact, EnrichmentStatus};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewContact {
    pub full_name: String,
    pub role: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct ContactPatch {
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, new: &NewContact) -> Result<Contact> {
        let row = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts
                (full_name, role, company_name, email, phone, linkedin_url, notes)
            VALUES ($1,$2,$3,$4,$5,$6,$7)
            RETURNING *
            "#,
        )
        .bind(&new.full_name)
        .bind(&new.role)
        .bind(&new.company_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.linkedin_url)
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Contact>> {
        let row = sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list(
        &self,
        company: Option<&str>,
        enrichment_status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>> {
        let rows = sqlx::query_as::<_, Contact>(
            r#"
            SELECT * FROM contacts
            WHERE ($1::text IS NULL OR company_name ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR enrichment_status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(company)
        .bind(enrichment_status)
        .bind(limit.clamp(1, 500))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update(&self, id: Uuid, patch: &ContactPatch) -> Result<Contact> {
        let row = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts SET
                full_name    = COALESCE($2, full_name),
                role         = COALESCE($3, role),
                company_name = COALESCE($4, company_name),
                email        = COALESCE($5, email),
                phone        = COALESCE($6, phone),
                linkedin_url = COALESCE($7, linkedin_url),
                notes        = COALESCE($8, notes),
                updated_at   = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.full_name)
        .bind(&patch.role)
        .bind(&patch.company_name)
        .bind(&patch.email)
        .bind(&patch.phone)
        .bind(&patch.linkedin_url)
        .bind(&patch.notes)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| DbError::NotFound(format!("contact {id}")))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_enrichment_status(&self, id: Uuid, status: EnrichmentStatus) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE contacts SET
                enrichment_status = $2,
                enriched_at = CASE WHEN $2 = 'completed' THEN now() ELSE enriched_at END,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Apply agent-provided fields without clobbering values the user
    /// already filled in by hand.
    pub async fn apply_enrichment(
        &self,
        id: Uuid,
        role: Option<&str>,
        email: Option<&str>,
        linkedin_url: Option<&str>,
    ) -> Result<Contact> {
        let row = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts SET
                role         = COALESCE(role, $2),
                email        = COALESCE(email, $3),
                linkedin_url = COALESCE(linkedin_url, $4),
                enrichment_status = 'completed',
                enriched_at  = now(),
                updated_at   = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(role)
        .bind(email)
        .bind(linkedin_url)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| DbError::NotFound(format!("contact {id}")))
    }
}
