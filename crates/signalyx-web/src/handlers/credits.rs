//! Credit-usage API.

use axum::{extract::State, response::IntoResponse, Json};

use signalyx_common::ApiError;

use crate::state::SharedState;

/// GET /api/credits — used/limit/percent/level per provider.
pub async fn credits_summary(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshots = state
        .ledger()
        .snapshot_all()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(snapshots))
}
