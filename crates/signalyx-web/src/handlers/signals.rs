//! Signal CRUD, status moves, enrichment trigger, and tone analysis.

use std::str::FromStr;

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
use signalyx_db::schema::{NewSignal, SignalKind, SignalOrigin, SignalStatus};
use signalyx_db::signals::{SignalFilter, SignalPatch};
use signalyx_db::tones::NewToneAnalysis;

use super::db_err;
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct SignalQuery {
    pub status: Option<String>,
    pub kind: Option<String>,
    pub origin: Option<String>,
    pub company: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SignalCreate {
    pub company_name: String,
    pub siren: Option<String>,
    pub kind: String,
    pub title: String,
    pub summary: Option<String>,
    pub source_url: Option<String>,
    pub published_on: Option<chrono::NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

/// Reject vocabulary the schema does not know before it reaches SQL.
fn validate_patch(patch: &SignalPatch) -> Result<(), ApiError> {
    if let Some(kind) = &patch.kind {
        SignalKind::from_str(kind).map_err(ApiError::BadRequest)?;
    }
    if let Some(status) = &patch.status {
        SignalStatus::from_str(status).map_err(ApiError::BadRequest)?;
    }
    Ok(())
}

/// GET /api/signals
pub async fn signal_list(
    State(state): State<SharedState>,
    Query(q): Query<SignalQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(s) = &q.status {
        SignalStatus::from_str(s).map_err(ApiError::BadRequest)?;
    }
    if let Some(k) = &q.kind {
        SignalKind::from_str(k).map_err(ApiError::BadRequest)?;
    }
    if let Some(o) = &q.origin {
        SignalOrigin::from_str(o).map_err(ApiError::BadRequest)?;
    }

    let filter = SignalFilter {
        status: q.status,
        kind: q.kind,
        origin: q.origin,
        company: q.company,
        limit: q.limit.unwrap_or(50),
        offset: q.offset.unwrap_or(0),
    };
    let rows = state.signals().list(&filter).await.map_err(db_err)?;
    Ok(Json(rows))
}

/// POST /api/signals — manual signal entry.
pub async fn signal_create(
    State(state): State<SharedState>,
    Json(body): Json<SignalCreate>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = SignalKind::from_str(&body.kind).map_err(ApiError::BadRequest)?;
    if body.company_name.trim().is_empty() {
        return Err(ApiError::BadRequest("company_name must not be empty".into()));
    }

    let new = NewSignal {
        company_name: body.company_name,
        siren: body.siren,
        kind,
        title: body.title,
        summary: body.summary,
        origin: SignalOrigin::Manual,
        source_url: body.source_url,
        published_on: body.published_on,
        dedup_hash: None,
    };
    let row = state.signals().insert(&new).await.map_err(db_err)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/signals/{id}
pub async fn signal_detail(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .signals()
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ApiError::NotFound(format!("signal {id}")))?;
    Ok(Json(row))
}

/// PATCH /api/signals/{id}
pub async fn signal_update(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<SignalPatch>,
) -> Result<impl IntoResponse, ApiError> {
    validate_patch(&patch)?;
    let row = state.signals().update(id, &patch).await.map_err(db_err)?;
    Ok(Json(row))
}

/// PATCH /api/signals/{id}/status
pub async fn signal_set_status(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> Result<impl IntoResponse, ApiError> {
    let status = SignalStatus::from_str(&body.status).map_err(ApiError::BadRequest)?;
    let row = state.signals().set_status(id, status).await.map_err(db_err)?;
    Ok(Json(row))
}

/// DELETE /api/signals/{id}
pub async fn signal_delete(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.signals().delete(id).await.map_err(db_err)? {
        return Err(ApiError::NotFound(format!("signal {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/signals/{id}/enrich — spawn a company-enrichment job.
pub async fn signal_enrich(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let signal = state
        .signals()
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ApiError::NotFound(format!("signal {id}")))?;

    let client = state.agent_client().await?;
    let job = state
        .enrichment_jobs()
        .insert("signal", signal.id)
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
            EnrichmentTarget::Signal(signal),
            ctx,
            client,
            PollSettings::default(),
        )
        .await;
    });

    Ok((StatusCode::ACCEPTED, Json(job)))
}

// ── Tone analysis ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ToneBody {
    /// Text of the LinkedIn post; defaults to the signal title.
    pub post_text: Option<String>,
    /// Engagement text; defaults to the signal summary.
    pub engagement: Option<String>,
    pub post_url: Option<String>,
}

/// POST /api/signals/{id}/tone — synchronous one-shot LLM call.
pub async fn signal_tone_run(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ToneBody>,
) -> Result<impl IntoResponse, ApiError> {
    let signal = state
        .signals()
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ApiError::NotFound(format!("signal {id}")))?;

    let post_text = body
        .post_text
        .unwrap_or_else(|| signal.title.clone());
    let engagement = body
        .engagement
        .or_else(|| signal.summary.clone())
        .ok_or_else(|| {
            ApiError::BadRequest("no engagement text available for this signal".into())
        })?;

    let analyzer = state.tone_analyzer().await?;
    let (profile, resp) = analyzer
        .analyze(&signal.company_name, &post_text, &engagement)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    let row = state
        .tones()
        .insert(&NewToneAnalysis {
            signal_id: signal.id,
            post_url: body.post_url.or(signal.source_url),
            audience_mood: profile.audience_mood,
            themes: serde_json::json!(profile.themes),
            outreach_angle: profile.outreach_angle,
            model: resp.model,
            prompt_tokens: resp.prompt_tokens as i32,
            completion_tokens: resp.completion_tokens as i32,
        })
        .await
        .map_err(db_err)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/signals/{id}/tone
pub async fn signal_tone_list(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.tones().list_for_signal(id).await.map_err(db_err)?;
    Ok(Json(rows))
}
