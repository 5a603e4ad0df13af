//! [`ApiError`] and its JSON `{"error": "..."}` response body.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  /// Unknown item id; 404.
  #[error("item {0:?} not found")]
  NotFound(String),

  /// Malformed answer body or out-of-range quality; 400.
  #[error("{0}")]
  BadRequest(String),

  /// The review store failed; the answer, if any, was not recorded.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// A core invariant was violated server-side.
  #[error(transparent)]
  Internal(babieta_core::Error),
}

impl From<babieta_core::Error> for ApiError {
  fn from(e: babieta_core::Error) -> Self {
    use babieta_core::Error as E;
    match e {
      E::UnknownItem(id) => Self::NotFound(id),
      E::InvalidQuality(_) => Self::BadRequest(e.to_string()),
      E::Store(inner) => Self::Store(inner),
      other => Self::Internal(other),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Store(_) | Self::Internal(_) => {
        tracing::error!(error = %self, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
