//! Axum router — maps all URL paths to handlers.

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use crate::handlers::{
    companies::company_sheet,
    contacts::{
        contact_create, contact_delete, contact_detail, contact_enrich, contact_list,
        contact_update,
    },
    credits::credits_summary,
    dashboard::dashboard_summary,
    enrichments::enrichment_detail,
    events::{
        event_contact_create, event_contact_delete, event_contact_list, event_contact_update,
        event_create, event_delete, event_detail, event_list, event_update,
    },
    partners::{partner_create, partner_delete, partner_detail, partner_list, partner_update},
    scans::{scan_detail, scan_launch, scan_list},
    settings::{setting_put, settings_list},
    signals::{
        signal_create, signal_delete, signal_detail, signal_enrich, signal_list,
        signal_set_status, signal_tone_list, signal_tone_run, signal_update,
    },
    system::health,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let spa_dir = state.config.server.spa_dir.clone();
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/dashboard", get(dashboard_summary))
        // Signals
        .route("/api/signals", get(signal_list).post(signal_create))
        .route(
            "/api/signals/{id}",
            get(signal_detail).patch(signal_update).delete(signal_delete),
        )
        .route("/api/signals/{id}/status", axum::routing::patch(signal_set_status))
        .route("/api/signals/{id}/enrich", post(signal_enrich))
        .route("/api/signals/{id}/tone", get(signal_tone_list).post(signal_tone_run))
        // Contacts
        .route("/api/contacts", get(contact_list).post(contact_create))
        .route(
            "/api/contacts/{id}",
            get(contact_detail).patch(contact_update).delete(contact_delete),
        )
        .route("/api/contacts/{id}/enrich", post(contact_enrich))
        // Partners
        .route("/api/partners", get(partner_list).post(partner_create))
        .route(
            "/api/partners/{id}",
            get(partner_detail).patch(partner_update).delete(partner_delete),
        )
        // Events & their contacts
        .route("/api/events", get(event_list).post(event_create))
        .route(
            "/api/events/{id}",
            get(event_detail).patch(event_update).delete(event_delete),
        )
        .route(
            "/api/events/{id}/contacts",
            get(event_contact_list).post(event_contact_create),
        )
        .route(
            "/api/event-contacts/{id}",
            axum::routing::patch(event_contact_update).delete(event_contact_delete),
        )
        // Settings & credits
        .route("/api/settings", get(settings_list))
        .route("/api/settings/{key}", put(setting_put))
        .route("/api/credits", get(credits_summary))
        // Scans & enrichment jobs (poll targets)
        .route("/api/scans", get(scan_list).post(scan_launch))
        .route("/api/scans/{id}", get(scan_detail))
        .route("/api/enrichments/{id}", get(enrichment_detail))
        // Registry passthrough
        .route("/api/companies/{siren}", get(company_sheet))
        // SPA bundle
        .fallback_service(ServeDir::new(spa_dir))
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
