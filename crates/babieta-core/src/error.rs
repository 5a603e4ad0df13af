//! Error types for `babieta-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("quality must be between 0 and 5, got {0}")]
  InvalidQuality(i64),

  #[error("invalid review state for item {item_id:?}: {reason}")]
  InvalidState { item_id: String, reason: String },

  #[error("unknown vocabulary item: {0:?}")]
  UnknownItem(String),

  #[error("duplicate vocabulary item id: {0:?}")]
  DuplicateItem(String),

  #[error("vocabulary item at position {0} has an empty id")]
  EmptyItemId(usize),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  /// The persistence collaborator failed. The computed state was not saved.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
