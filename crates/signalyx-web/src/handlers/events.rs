//! Event CRUD and the contacts met at each event.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use signalyx_common::ApiError;
use signalyx_db::events::{EventContactPatch, EventPatch, NewEvent, NewEventContact};

use super::db_err;
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/events
pub async fn event_list(
    State(state): State<SharedState>,
    Query(q): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .events()
        .list(q.limit.unwrap_or(50), q.offset.unwrap_or(0))
        .await
        .map_err(db_err)?;
    Ok(Json(rows))
}

/// POST /api/events
pub async fn event_create(
    State(state): State<SharedState>,
    Json(body): Json<NewEvent>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }
    let row = state.events().insert(&body).await.map_err(db_err)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/events/{id}
pub async fn event_detail(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .events()
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ApiError::NotFound(format!("event {id}")))?;
    Ok(Json(row))
}

/// PATCH /api/events/{id}
pub async fn event_update(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<EventPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state.events().update(id, &patch).await.map_err(db_err)?;
    Ok(Json(row))
}

/// DELETE /api/events/{id} — cascades to the event's contacts.
pub async fn event_delete(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.events().delete(id).await.map_err(db_err)? {
        return Err(ApiError::NotFound(format!("event {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ── Event contacts ────────────────────────────────────────────────────────────

/// GET /api/events/{id}/contacts
pub async fn event_contact_list(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    // 404 for unknown events rather than an empty list.
    state
        .events()
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ApiError::NotFound(format!("event {id}")))?;
    let rows = state.events().list_contacts(id).await.map_err(db_err)?;
    Ok(Json(rows))
}

/// POST /api/events/{id}/contacts
pub async fn event_contact_create(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<NewEventContact>,
) -> Result<impl IntoResponse, ApiError> {
    if body.full_name.trim().is_empty() {
        return Err(ApiError::BadRequest("full_name must not be empty".into()));
    }
    state
        .events()
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ApiError::NotFound(format!("event {id}")))?;
    let row = state.events().insert_contact(id, &body).await.map_err(db_err)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/event-contacts/{id} — including the follow-up flag.
pub async fn event_contact_update(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<EventContactPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state.events().update_contact(id, &patch).await.map_err(db_err)?;
    Ok(Json(row))
}

/// DELETE /api/event-contacts/{id}
pub async fn event_contact_delete(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.events().delete_contact(id).await.map_err(db_err)? {
        return Err(ApiError::NotFound(format!("event contact {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}
