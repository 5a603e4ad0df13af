//! Handlers for progress and statistics.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/progress/today` | Zero counters if nothing was answered today |
//! | `GET`  | `/stats` | Lifetime statistics |

use axum::{Json, extract::State};
use babieta_core::{
  progress::{DailyProgress, StudyStatistics},
  session::StudySession,
  store::ReviewStore,
};

use crate::error::ApiError;

/// `GET /progress/today`
pub async fn today<S>(
  State(session): State<StudySession<S>>,
) -> Result<Json<DailyProgress>, ApiError>
where
  S: ReviewStore,
{
  Ok(Json(session.today_progress().await?))
}

/// `GET /stats`
pub async fn stats<S>(
  State(session): State<StudySession<S>>,
) -> Result<Json<StudyStatistics>, ApiError>
where
  S: ReviewStore,
{
  Ok(Json(session.statistics().await?))
}
