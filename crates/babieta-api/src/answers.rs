//! `POST /answers`: record one answer.
//!
//! Body is either `{"item_id":"...","quality":0-5}` or
//! `{"item_id":"...","outcome":"correct"|"wrong"|"unknown"}`. Exactly one of
//! `quality` and `outcome` must be present.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use babieta_core::{
  review::{AnswerOutcome, Quality},
  session::StudySession,
  store::ReviewStore,
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct AnswerBody {
  pub item_id: String,
  /// Raw grade; range-checked here rather than by the deserialiser so that a
  /// bad value yields a 400 with a useful message.
  pub quality: Option<i64>,
  pub outcome: Option<String>,
}

impl AnswerBody {
  fn quality(&self) -> Result<Quality, ApiError> {
    match (self.quality, self.outcome.as_deref()) {
      (Some(q), None) => Ok(Quality::try_from(q)?),
      (None, Some(o)) => o
        .parse::<AnswerOutcome>()
        .map(AnswerOutcome::quality)
        .map_err(|_| ApiError::BadRequest(format!("unknown outcome {o:?}"))),
      (Some(_), Some(_)) => Err(ApiError::BadRequest(
        "give either quality or outcome, not both".to_string(),
      )),
      (None, None) => Err(ApiError::BadRequest(
        "one of quality or outcome is required".to_string(),
      )),
    }
  }
}

/// `POST /answers`; returns 201 and the persisted [`AnswerRecord`](babieta_core::session::AnswerRecord).
pub async fn create<S>(
  State(session): State<StudySession<S>>,
  Json(body): Json<AnswerBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ReviewStore,
{
  let quality = body.quality()?;
  let record = session.answer(&body.item_id, quality).await?;
  Ok((StatusCode::CREATED, Json(record)))
}
