//! Handlers for the read-only catalog and the review states.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/items` | Whole catalog, in catalog order |
//! | `GET`  | `/items/:id` | Item, its state (or `null`), mastery; 404 if unknown |
//! | `GET`  | `/states` | All review states |

use axum::{
  Json,
  extract::{Path, State},
};
use babieta_core::{
  item::VocabularyItem,
  review::ReviewState,
  session::{ItemView, StudySession},
  store::ReviewStore,
};

use crate::error::ApiError;

/// `GET /items`
pub async fn list<S>(State(session): State<StudySession<S>>) -> Json<Vec<VocabularyItem>>
where
  S: ReviewStore,
{
  Json(session.catalog().items().to_vec())
}

/// `GET /items/:id`
pub async fn get_one<S>(
  State(session): State<StudySession<S>>,
  Path(id): Path<String>,
) -> Result<Json<ItemView>, ApiError>
where
  S: ReviewStore,
{
  Ok(Json(session.item(&id).await?))
}

/// `GET /states`
pub async fn states<S>(
  State(session): State<StudySession<S>>,
) -> Result<Json<Vec<ReviewState>>, ApiError>
where
  S: ReviewStore,
{
  Ok(Json(session.states().await?))
}
