//! Unified request-level error type
//!
//! `ApiError` bridges the db layer (`sqlx::Error`), the image store
//! (`std::io::Error`), and the HTTP surface. Every variant maps to the JSON
//! error envelope `{"ok": false, "message": ...}` with a status for its
//! error class. Store and IO failures are logged server-side and collapsed
//! to a generic message so no backend detail leaks to clients.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing row (404)
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Malformed id or payload (400)
    #[error("{0}")]
    Validation(String),
    /// Bad credentials or missing/invalid/expired token (401)
    #[error("unauthorized")]
    Unauthorized,
    /// Duplicate resource, e.g. an email already in use (409)
    #[error("{0}")]
    Conflict(String),
    /// Underlying database failure, including timeouts (500)
    #[error("store error")]
    Store(#[from] sqlx::Error),
    /// Blob-store / image failure (500)
    #[error("image store error")]
    Io(#[from] std::io::Error),
    /// Anything else internal, e.g. hashing or signing failures (500)
    #[error("internal error")]
    Internal,
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Store(_) | ApiError::Io(_) | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to clients. Internal variants keep their generic
    /// display text; everything else carries its own message.
    fn public_message(&self) -> String {
        match self {
            ApiError::Store(_) => "store error".into(),
            ApiError::Io(_) => "image store error".into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(e) => tracing::error!(error = %e, "store error"),
            ApiError::Io(e) => tracing::error!(error = %e, "image store error"),
            ApiError::Internal => tracing::error!("internal error"),
            _ => {}
        }
        let body = serde_json::json!({ "ok": false, "message": self.public_message() });
        (self.status(), Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_per_error_class() {
        assert_eq!(ApiError::NotFound("product").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::validation("invalid id parameter").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::conflict("email already in use").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Store(sqlx::Error::PoolTimedOut).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_errors_never_leak_detail() {
        let err = ApiError::Store(sqlx::Error::Protocol("secret backend detail".into()));
        assert_eq!(err.public_message(), "store error");
    }

    #[test]
    fn unauthorized_message_is_generic() {
        // Sign-in funnels both "no such email" and "wrong password" here,
        // so the one message must not distinguish the two.
        assert_eq!(ApiError::Unauthorized.public_message(), "unauthorized");
    }
}
