//! Contact CRUD and enrichment trigger.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use signalyx_agents::{run_enrichment, EnrichmentContext, EnrichmentTarget, PollSettings};
use signalyx_common::ApiError;
use signalyx_db::contacts::{ContactPatch, NewContact};
use signalyx_db::schema::EnrichmentStatus;

use super::db_err;
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct ContactQuery {
    pub company: Option<String>,
    pub enrichment_status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/contacts
pub async fn contact_list(
    State(state): State<SharedState>,
    Query(q): Query<ContactQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(s) = &q.enrichment_status {
        s.parse::<EnrichmentStatus>().map_err(ApiError::BadRequest)?;
    }
    let rows = state
        .contacts()
        .list(
            q.company.as_deref(),
            q.enrichment_status.as_deref(),
            q.limit.unwrap_or(50),
            q.offset.unwrap_or(0),
        )
        .await
        .map_err(db_err)?;
    Ok(Json(rows))
}

/// POST /api/contacts
pub async fn contact_create(
    State(state): State<SharedState>,
    Json(body): Json<NewContact>,
) -> Result<impl IntoResponse, ApiError> {
    if body.full_name.trim().is_empty() {
        return Err(ApiError::BadRequest("full_name must not be empty".into()));
    }
    let row = state.contacts().insert(&body).await.map_err(db_err)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/contacts/{id}
pub async fn contact_detail(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .contacts()
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ApiError::NotFound(format!("contact {id}")))?;
    Ok(Json(row))
}

/// PATCH /api/contacts/{id}
pub async fn contact_update(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ContactPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state.contacts().update(id, &patch).await.map_err(db_err)?;
    Ok(Json(row))
}

/// DELETE /api/contacts/{id}
pub async fn contact_delete(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.contacts().delete(id).await.map_err(db_err)? {
        return Err(ApiError::NotFound(format!("contact {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/contacts/{id}/enrich — spawn an agent enrichment job.
///
/// Returns 202 with the job row; the SPA polls `/api/enrichments/{id}`.
pub async fn contact_enrich(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = state
        .contacts()
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ApiError::NotFound(format!("contact {id}")))?;

    if contact.enrichment_status == "pending" || contact.enrichment_status == "processing" {
        return Err(ApiError::Conflict(
            "an enrichment is already running for this contact".into(),
        ));
    }

    let client = state.agent_client().await?;
    let job = state
        .enrichment_jobs()
        .insert("contact", contact.id)
        .await
        .map_err(db_err)?;
    state
        .contacts()
        .set_enrichment_status(contact.id, EnrichmentStatus::Pending)
        .await
        .map_err(db_err)?;

    let ctx = EnrichmentContext {
        jobs: state.enrichment_jobs(),
        contacts: state.contacts(),
        signals: state.signals(),
        ledger: state.ledger(),
    };
    let job_id = job.id;
    tokio::spawn(async move {
        run_enrichment(
            job_id,
            EnrichmentTarget::Contact(contact),
            ctx,
            client,
            PollSettings::default(),
        )
        .await;
    });

    Ok((StatusCode::ACCEPTED, Json(job)))
}
