//! Tone-analysis repository.

use crate::error::Result;
use crate::schema::ToneAnalysis;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewToneAnalysis {
    pub signal_id: Uuid,
    pub post_url: Option<String>,
    pub audience_mood: String,
    pub themes: serde_json::Value,
    pub outreach_angle: String,
    pub model: String,
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
}

#[derive(Clone)]
pub struct ToneAnalysisRepository {
    pool: PgPool,
}

impl ToneAnalysisRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, new: &NewToneAnalysis) -> Result<ToneAnalysis> {
        let row = sqlx::query_as::<_, ToneAnalysis>(
            r#"
            INSERT INTO tone_analyses
                (signal_id, post_url, audience_mood, themes, outreach_angle,
                 model, prompt_tokens, completion_tokens)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            RETURNING *
            "#,
        )
        .bind(new.signal_id)
        .bind(&new.post_url)
        .bind(&new.audience_mood)
        .bind(&new.themes)
        .bind(&new.outreach_angle)
        .bind(&new.model)
        .bind(new.prompt_tokens)
        .bind(new.completion_tokens)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list_for_signal(&self, signal_id: Uuid) -> Result<Vec<ToneAnalysis>> {
        let rows = sqlx::query_as::<_, ToneAnalysis>(
            "SELECT * FROM tone_analyses WHERE signal_id = $1 ORDER BY created_at DESC",
        )
        .bind(signal_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
