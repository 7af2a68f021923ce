//! Scan launch and polling.
//!
//! POST inserts the scan row and spawns the pipeline in a background
//! task; the response is the `pending` row. The SPA re-fetches
//! `GET /api/scans/{id}` on a fixed interval until the status is
//! terminal. No queue, no retries.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use signalyx_common::ApiError;
use signalyx_db::schema::ScanKind;
use signalyx_sources::sources::linkedin::LinkedinClient;
use signalyx_sources::sources::press::PressClient;
use signalyx_sources::sources::rss::RssPressClient;
use signalyx_sources::{run_scan, ScanContext, ScanParams, SignalSource};

use super::db_err;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct ScanBody {
    pub kind: String,
    #[serde(default)]
    pub params: ScanParams,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScanListQuery {
    pub limit: Option<i64>,
}

/// POST /api/scans
pub async fn scan_launch(
    State(state): State<SharedState>,
    Json(body): Json<ScanBody>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = ScanKind::from_str(&body.kind).map_err(ApiError::BadRequest)?;
    let params = with_defaults(&state, kind, body.params).await?;
    let sources = build_sources(&state, kind).await?;

    let scan = state
        .scans()
        .insert(kind, &serde_json::to_value(&params).unwrap_or_default())
        .await
        .map_err(db_err)?;

    let ctx = ScanContext {
        signals: state.signals(),
        scans: state.scans(),
        ledger: state.ledger(),
    };
    let scan_id = scan.id;
    tokio::spawn(async move {
        run_scan(scan_id, kind, params, ctx, sources).await;
    });

    Ok((StatusCode::ACCEPTED, Json(scan)))
}

/// GET /api/scans
pub async fn scan_list(
    State(state): State<SharedState>,
    Query(q): Query<ScanListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .scans()
        .recent(q.limit.unwrap_or(20))
        .await
        .map_err(db_err)?;
    Ok(Json(rows))
}

/// GET /api/scans/{id} — the poll target.
pub async fn scan_detail(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .scans()
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or_else(|| ApiError::NotFound(format!("scan {id}")))?;
    Ok(Json(row))
}

// ── Param defaults from the settings table ────────────────────────────────────

async fn with_defaults(
    state: &SharedState,
    kind: ScanKind,
    mut params: ScanParams,
) -> Result<ScanParams, ApiError> {
    let settings = state.settings();
    match kind {
        ScanKind::Press => {
            if params.query.is_none() {
                params.query = settings
                    .get_string("press_query")
                    .await
                    .map_err(db_err)?;
            }
            if params.query.is_none() {
                return Err(ApiError::BadRequest(
                    "press scans need a query (request param or 'press_query' setting)".into(),
                ));
            }
        }
        ScanKind::Registry => {
            if params.anniversary_years.is_none() {
                params.anniversary_years = settings
                    .get("anniversary_years")
                    .await
                    .map_err(db_err)?
                    .and_then(|v| serde_json::from_value(v).ok());
            }
        }
        ScanKind::Linkedin => {
            if params.post_urls.is_none() {
                params.post_urls = settings
                    .get("linkedin_post_urls")
                    .await
                    .map_err(db_err)?
                    .and_then(|v| serde_json::from_value(v).ok());
            }
            if params.post_urls.as_deref().map_or(true, |u| u.is_empty()) {
                return Err(ApiError::BadRequest(
                    "linkedin scans need post_urls (request param or 'linkedin_post_urls' setting)"
                        .into(),
                ));
            }
        }
    }
    Ok(params)
}

// ── Source construction per scan kind ─────────────────────────────────────────

async fn build_sources(
    state: &SharedState,
    kind: ScanKind,
) -> Result<Vec<Arc<dyn SignalSource>>, ApiError> {
    let mut sources: Vec<Arc<dyn SignalSource>> = Vec::new();
    match kind {
        ScanKind::Press => {
            // The RSS feed is free and always on; the search API joins in
            // when a key is configured.
            sources.push(Arc::new(RssPressClient::new(state.http.clone())));
            if let Ok(key) = state
                .credential("news_api_key", state.config.providers.news_api_key.as_ref())
                .await
            {
                sources.push(Arc::new(PressClient::new(state.http.clone(), key)));
            }
        }
        ScanKind::Registry => {
            sources.push(Arc::new(state.pappers_client().await?));
        }
        ScanKind::Linkedin => {
            let token = state
                .credential("apify_token", state.config.providers.apify_token.as_ref())
                .await?;
            let actor = state
                .settings()
                .get_string("apify_actor")
                .await
                .map_err(db_err)?
                .or_else(|| state.config.providers.apify_actor.clone());
            sources.push(Arc::new(LinkedinClient::new(state.http.clone(), token, actor)));
        }
    }
    Ok(sources)
}
