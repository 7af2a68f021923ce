use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalyxError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Upstream {provider} error: {message}")]
    Upstream { provider: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Outbound request blocked: {0}")]
    Blocked(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SignalyxError>;

/// Error type returned by API handlers. Maps onto an HTTP status and a
/// `{ "error": "..." }` JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "API handler failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("resource not found".to_string()),
            other => ApiError::Internal(format!("database error: {other}")),
        }
    }
}

impl From<SignalyxError> for ApiError {
    fn from(err: SignalyxError) -> Self {
        match err {
            SignalyxError::NotFound(m) => ApiError::NotFound(m),
            SignalyxError::Validation(m) => ApiError::BadRequest(m),
            SignalyxError::Upstream { provider, message } => {
                ApiError::Upstream(format!("{provider}: {message}"))
            }
            SignalyxError::Http(e) => ApiError::Upstream(e.to_string()),
            SignalyxError::Database(e) => ApiError::from(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_404() {
        let api: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(api, ApiError::NotFound(_)));
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let api: ApiError = SignalyxError::Validation("kind must be one of ...".into()).into();
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_maps_to_502() {
        let api: ApiError = SignalyxError::Upstream {
            provider: "pappers".into(),
            message: "quota exceeded".into(),
        }
        .into();
        assert_eq!(api.status(), StatusCode::BAD_GATEWAY);
        assert!(api.to_string().contains("pappers"));
    }
}
