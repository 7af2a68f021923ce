//! Registry lookup passthrough.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use signalyx_common::ApiError;
use signalyx_credits::{Provider, UsageLevel};

use crate::state::SharedState;

/// GET /api/companies/{siren} — Pappers company sheet for detail views.
/// Counted against the Pappers credit budget like any other registry call.
pub async fn company_sheet(
    State(state): State<SharedState>,
    Path(siren): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let siren: String = siren.chars().filter(|c| c.is_ascii_digit()).collect();
    if siren.len() != 9 {
        return Err(ApiError::BadRequest("SIREN must be 9 digits".into()));
    }

    let ledger = state.ledger();
    if ledger
        .level(Provider::Pappers)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        == UsageLevel::Blocked
    {
        return Err(ApiError::Conflict(
            "monthly Pappers credit limit reached".into(),
        ));
    }

    let client = state.pappers_client().await?;
    let sheet = client
        .company_sheet(&siren)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("no company for SIREN {siren}")))?;

    if let Err(e) = ledger.record(Provider::Pappers, 1).await {
        tracing::warn!(error = %e, "pappers credit record failed");
    }
    Ok(Json(sheet))
}
