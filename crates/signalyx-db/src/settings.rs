//! Settings repository — a single JSONB value per key.
//!
//! Holds API credentials and scan defaults. Secret redaction happens at
//! the API layer, not here.

use crate::error::Result;
use crate::schema::SettingRow;
use sqlx::PgPool;

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let value: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    /// Convenience accessor for string-valued settings (API keys, query
    /// terms). Returns None for missing keys or non-string values.
    pub async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .get(key)
            .await?
            .and_then(|v| v.as_str().map(String::from)))
    }

    pub async fn set(&self, key: &str, value: &serde_json::Value) -> Result<SettingRow> {
        let row = sqlx::query_as::<_, SettingRow>(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            RETURNING *
            "#,
        )
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn all(&self) -> Result<Vec<SettingRow>> {
        let rows = sqlx::query_as::<_, SettingRow>("SELECT * FROM settings ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
