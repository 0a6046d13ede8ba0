//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roster_core::{Error as CoreError, store::StoreError, validation::ValidationErrors};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  /// Malformed path, query string or body.
  #[error("bad request: {0}")]
  BadRequest(String),

  /// Field-level validation failure; rendered as `{"error", "fields"}`.
  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Domain failures keep their meaning (404, 409); anything else is a 500.
  pub fn store(e: impl StoreError) -> Self {
    let mapped = e.domain().map(|domain| match domain {
      CoreError::JobNotFound(_) => Self::NotFound(domain.to_string()),
      CoreError::OrderMismatch { .. } => Self::Conflict(domain.to_string()),
    });
    mapped.unwrap_or_else(|| Self::Store(Box::new(e)))
  }

  /// `Ok(())` for an empty set of field errors.
  pub fn check(errors: ValidationErrors) -> Result<(), Self> {
    if errors.is_empty() { Ok(()) } else { Err(Self::Validation(errors)) }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Validation(fields) => (
        StatusCode::BAD_REQUEST,
        json!({ "error": "validation failed", "fields": fields }),
      ),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, json!({ "error": m })),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
      }
    };
    (status, Json(body)).into_response()
  }
}
