//! Event and event-contact repository.
//!
//! Event contacts are people met at a networking event; they live under
//! their event and are deleted with it.

use crate::error::{DbError, Result};
use crate::schema::{Event, EventContact};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub starts_on: Option<chrono::NaiveDate>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct EventPatch {
    pub name: Option<String>,
    pub starts_on: Option<chrono::NaiveDate>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewEventContact {
    pub full_name: String,
    pub company_name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct EventContactPatch {
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub followed_up: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ── Events ───────────────────────────────────────────────────────────────

    pub async fn insert(&self, new: &NewEvent) -> Result<Event> {
        let row = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (name, starts_on, location, description)
            VALUES ($1,$2,$3,$4)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(new.starts_on)
        .bind(&new.location)
        .bind(&new.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, Event>(
            "SELECT * FROM events ORDER BY starts_on DESC NULLS LAST LIMIT $1 OFFSET $2",
        )
        .bind(limit.clamp(1, 500))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update(&self, id: Uuid, patch: &EventPatch) -> Result<Event> {
        let row = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET
                name        = COALESCE($2, name),
                starts_on   = COALESCE($3, starts_on),
                location    = COALESCE($4, location),
                description = COALESCE($5, description),
                updated_at  = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(patch.starts_on)
        .bind(&patch.location)
        .bind(&patch.description)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| DbError::NotFound(format!("event {id}")))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Event contacts ───────────────────────────────────────────────────────

    pub async fn insert_contact(&self, event_id: Uuid, new: &NewEventContact) -> Result<EventContact> {
        let row = sqlx::query_as::<_, EventContact>(
            r#"
            INSERT INTO event_contacts (event_id, full_name, company_name, role, email, notes)
            VALUES ($1,$2,$3,$4,$5,$6)
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(&new.full_name)
        .bind(&new.company_name)
        .bind(&new.role)
        .bind(&new.email)
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list_contacts(&self, event_id: Uuid) -> Result<Vec<EventContact>> {
        let rows = sqlx::query_as::<_, EventContact>(
            "SELECT * FROM event_contacts WHERE event_id = $1 ORDER BY full_name",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update_contact(&self, id: Uuid, patch: &EventContactPatch) -> Result<EventContact> {
        let row = sqlx::query_as::<_, EventContact>(
            r#"
            UPDATE event_contacts SET
                full_name    = COALESCE($2, full_name),
                company_name = COALESCE($3, company_name),
                role         = COALESCE($4, role),
                email        = COALESCE($5, email),
                followed_up  = COALESCE($6, followed_up),
                notes        = COALESCE($7, notes),
                updated_at   = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.full_name)
        .bind(&patch.company_name)
        .bind(&patch.role)
        .bind(&patch.email)
        .bind(patch.followed_up)
        .bind(&patch.notes)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| DbError::NotFound(format!("event contact {id}")))
    }

    pub async fn delete_contact(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM event_contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
