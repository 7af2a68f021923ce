//! Dashboard summary endpoint.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use signalyx_common::ApiError;
use signalyx_credits::CreditSnapshot;
use signalyx_db::schema::Signal;

use super::db_err;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub signals_by_status: Vec<CountRow>,
    pub signals_by_kind: Vec<CountRow>,
    pub latest_signals: Vec<Signal>,
    pub credits: Vec<CreditSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct CountRow {
    pub label: String,
    pub count: i64,
}

/// GET /api/dashboard — everything the landing page needs in one call.
pub async fn dashboard_summary(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let signals = state.signals();

    let by_status = signals.counts_by_status().await.map_err(db_err)?;
    let by_kind = signals.counts_by_kind().await.map_err(db_err)?;
    let latest = signals.recent(10).await.map_err(db_err)?;
    let credits = state
        .ledger()
        .snapshot_all()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(DashboardSummary {
        signals_by_status: to_rows(by_status),
        signals_by_kind: to_rows(by_kind),
        latest_signals: latest,
        credits,
    }))
}

fn to_rows(pairs: Vec<(String, i64)>) -> Vec<CountRow> {
    pairs
        .into_iter()
        .map(|(label, count)| CountRow { label, count })
        .collect()
}
