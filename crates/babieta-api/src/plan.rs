//! `GET /plan`: today's study queue.

use axum::{Json, extract::State};
use babieta_core::{
  session::{PlanEntry, StudySession},
  settings::ReviewMode,
  store::ReviewStore,
};
use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct PlanResponse {
  pub date:         NaiveDate,
  pub mode:         ReviewMode,
  pub review_count: usize,
  pub new_count:    usize,
  pub total:        usize,
  /// Entries in presentation order.
  pub queue:        Vec<PlanEntry>,
}

/// `GET /plan`
pub async fn today<S>(State(session): State<StudySession<S>>) -> Result<Json<PlanResponse>, ApiError>
where
  S: ReviewStore,
{
  let plan = session.plan().await?;
  Ok(Json(PlanResponse {
    date:         plan.date,
    mode:         plan.mode,
    review_count: plan.review.len(),
    new_count:    plan.new.len(),
    total:        plan.total(),
    queue:        plan.queue(),
  }))
}
