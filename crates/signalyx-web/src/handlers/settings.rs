//! Settings API with secret redaction.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use signalyx_common::ApiError;

use super::db_err;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct SettingView {
    pub key: String,
    /// Cleartext for ordinary settings; absent for secrets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Present (true/false) only for secret keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<bool>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Credentials never leave the server in reads.
fn is_secret(key: &str) -> bool {
    key.ends_with("_api_key") || key.ends_with("_token")
}

/// GET /api/settings
pub async fn settings_list(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state.settings().all().await.map_err(db_err)?;
    let views: Vec<SettingView> = rows
        .into_iter()
        .map(|row| {
            if is_secret(&row.key) {
                let set = row
                    .value
                    .as_str()
                    .map(|s| !s.is_empty())
                    .unwrap_or(!row.value.is_null());
                SettingView {
                    key: row.key,
                    value: None,
                    set: Some(set),
                    updated_at: row.updated_at,
                }
            } else {
                SettingView {
                    key: row.key,
                    value: Some(row.value),
                    set: None,
                    updated_at: row.updated_at,
                }
            }
        })
        .collect();
    Ok(Json(views))
}

/// PUT /api/settings/{key} — body is the raw JSON value to store.
pub async fn setting_put(
    State(state): State<SharedState>,
    Path(key): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    if key.trim().is_empty() || key.len() > 128 {
        return Err(ApiError::BadRequest("invalid setting key".into()));
    }
    let row = state.settings().set(&key, &value).await.map_err(db_err)?;

    // Echo through the same redaction as the list endpoint.
    let view = if is_secret(&row.key) {
        SettingView {
            key: row.key,
            value: None,
            set: Some(true),
            updated_at: row.updated_at,
        }
    } else {
        SettingView {
            key: row.key,
            value: Some(row.value),
            set: None,
            updated_at: row.updated_at,
        }
    };
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_key_detection() {
        assert!(is_secret("pappers_api_key"));
        assert!(is_secret("apify_token"));
        assert!(!is_secret("press_query"));
        assert!(!is_secret("anniversary_years"));
    }
}
