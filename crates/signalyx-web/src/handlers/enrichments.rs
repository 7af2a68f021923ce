//! Enrichment-job polling.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use signalyx_common::ApiError;

use super::db_err;
use crate::state::SharedState;

/// GET /api/enrichments/{id} — the poll target for a running enrichment.
pub async fn enrichment_detail(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .enrichment_jobs()
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ApiError::NotFound(format!("enrichment job {id}")))?;
    Ok(Json(row))
}
