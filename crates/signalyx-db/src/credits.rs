//! Credit-usage repository — one counter row per provider per month.

use crate::error::Result;
use crate::schema::CreditUsage;
use sqlx::PgPool;

#[derive(Clone)]
pub struct CreditUsageRepository {
    pool: PgPool,
}

impl CreditUsageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Units consumed by a provider in the given `YYYY-MM` period.
    pub async fn used(&self, provider: &str, period: &str) -> Result<i32> {
        let used: Option<i32> = sqlx::query_scalar(
            "SELECT used FROM credit_usage WHERE provider = $1 AND period = $2",
        )
        .bind(provider)
        .bind(period)
        .fetch_optional(&self.pool)
        .await?;
        Ok(used.unwrap_or(0))
    }

    /// Add `n` consumed units, creating the period row on first use.
    pub async fn record(&self, provider: &str, period: &str, n: i32) -> Result<CreditUsage> {
        let row = sqlx::query_as::<_, CreditUsage>(
            r#"
            INSERT INTO credit_usage (provider, period, used, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (provider, period)
                DO UPDATE SET used = credit_usage.used + EXCLUDED.used, updated_at = now()
            RETURNING *
            "#,
        )
        .bind(provider)
        .bind(period)
        .bind(n)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn all_for_period(&self, period: &str) -> Result<Vec<CreditUsage>> {
        let rows = sqlx::query_as::<_, CreditUsage>(
            "SELECT * FROM credit_usage WHERE period = $1 ORDER BY provider",
        )
        .bind(period)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
