//! Liveness endpoint.

use axum::{extract::State, response::IntoResponse, Json};

use crate::state::SharedState;

/// GET /api/health — process liveness plus a database ping.
pub async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    let db_up = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();

    Json(serde_json::json!({
        "status": if db_up { "ok" } else { "degraded" },
        "database": if db_up { "up" } else { "down" },
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
