//! Partner CRUD.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use signalyx_common::ApiError;
use signalyx_db::partners::{NewPartner, PartnerPatch};
use signalyx_db::schema::PartnerStatus;

use super::db_err;
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct PartnerQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/partners
pub async fn partner_list(
    State(state): State<SharedState>,
    Query(q): Query<PartnerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(s) = &q.status {
        s.parse::<PartnerStatus>().map_err(ApiError::BadRequest)?;
    }
    let rows = state
        .partners()
        .list(q.status.as_deref(), q.limit.unwrap_or(50), q.offset.unwrap_or(0))
        .await
        .map_err(db_err)?;
    Ok(Json(rows))
}

/// POST /api/partners
pub async fn partner_create(
    State(state): State<SharedState>,
    Json(body): Json<NewPartner>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }
    let row = state.partners().insert(&body).await.map_err(db_err)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/partners/{id}
pub async fn partner_detail(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .partners()
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ApiError::NotFound(format!("partner {id}")))?;
    Ok(Json(row))
}

/// PATCH /api/partners/{id}
pub async fn partner_update(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<PartnerPatch>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(s) = &patch.status {
        s.parse::<PartnerStatus>().map_err(ApiError::BadRequest)?;
    }
    let row = state.partners().update(id, &patch).await.map_err(db_err)?;
    Ok(Json(row))
}

/// DELETE /api/partners/{id}
pub async fn partner_delete(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.partners().delete(id).await.map_err(db_err)? {
        return Err(ApiError::NotFound(format!("partner {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}
