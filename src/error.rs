//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("validation: {0}")]
    Validation(String),
    /// Business-rule rejection; the message is sent to the client as-is.
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
}

/// Store failures are passed through unclassified: the driver message plus the SQL state when one exists.
#[derive(Serialize)]
pub struct RawErrorBody {
    pub message: String,
    pub code: Option<String>,
}

#[derive(Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Db(_) | AppError::Serde(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Db(e) => {
                tracing::debug!(error = %e, "store error");
                let code = e
                    .as_database_error()
                    .and_then(|d| d.code())
                    .map(|c| c.into_owned());
                (status, Json(RawErrorBody { message: e.to_string(), code })).into_response()
            }
            AppError::Serde(e) => (
                status,
                Json(RawErrorBody {
                    message: e.to_string(),
                    code: None,
                }),
            )
                .into_response(),
            AppError::Unauthorized(msg) | AppError::Forbidden(msg) => (status, Json(msg)).into_response(),
            other => (
                status,
                Json(MessageBody {
                    message: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn unauthorized_is_a_bare_string() {
        let (status, body) = body_of(AppError::Unauthorized("register first".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!("register first"));
    }

    #[tokio::test]
    async fn store_errors_are_500_with_raw_message() {
        let (status, body) = body_of(AppError::Db(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"].as_str().unwrap_or_default().contains("pool timed out"));
        assert!(body["code"].is_null());
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let (status, body) = body_of(AppError::NotFound("expert 7".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "not found: expert 7");
    }
}
