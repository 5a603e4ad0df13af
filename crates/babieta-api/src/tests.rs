//! Router tests driven with `tower::ServiceExt::oneshot` over a memory store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use babieta_core::{
  clock::FixedClock,
  item::{Catalog, VocabularyItem},
  memory::MemoryStore,
  progress::{DailyProgress, ProgressPatch},
  review::ReviewState,
  session::StudySession,
  settings::{ReviewMode, UserSettings},
  store::ReviewStore,
};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2025, 7, d).unwrap() }

fn catalog() -> Arc<Catalog> {
  Arc::new(
    Catalog::from_items(vec![
      VocabularyItem::new("privet", "Привет", "hello"),
      VocabularyItem::new("spasibo", "Спасибо", "thank you"),
      VocabularyItem::new("da", "Да", "yes"),
    ])
    .unwrap(),
  )
}

fn app(store: &Arc<MemoryStore>, d: u32) -> Router {
  let settings = UserSettings { daily_new_words: 2, review_mode: ReviewMode::ReviewFirst };
  let session =
    StudySession::new(Arc::clone(store), catalog(), settings).with_clock(FixedClock(day(d)));
  api_router(session)
}

async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app.oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
  let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, json)
}

// ── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn lists_catalog_in_order() {
  let store = Arc::new(MemoryStore::new());
  let (status, body) = call(app(&store, 1), "GET", "/items", None).await;
  assert_eq!(status, StatusCode::OK);
  let ids: Vec<_> = body.as_array().unwrap().iter().map(|i| i["id"].clone()).collect();
  assert_eq!(ids, vec![json!("privet"), json!("spasibo"), json!("da")]);
}

#[tokio::test]
async fn unknown_item_is_404() {
  let store = Arc::new(MemoryStore::new());
  let (status, body) = call(app(&store, 1), "GET", "/items/nyet", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("nyet"));
}

#[tokio::test]
async fn item_view_has_null_state_until_answered() {
  let store = Arc::new(MemoryStore::new());
  let (status, body) = call(app(&store, 1), "GET", "/items/da", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["item"]["headword"], "Да");
  assert!(body["state"].is_null());
  assert_eq!(body["mastery_level"], 0);
}

// ── Plan and answers ────────────────────────────────────────────────────────

#[tokio::test]
async fn plan_caps_new_items() {
  let store = Arc::new(MemoryStore::new());
  let (status, body) = call(app(&store, 1), "GET", "/plan", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["date"], "2025-07-01");
  assert_eq!(body["review_count"], 0);
  assert_eq!(body["new_count"], 2);
  assert_eq!(body["queue"][0]["kind"], "new");
  assert_eq!(body["queue"][0]["item"]["id"], "privet");
}

#[tokio::test]
async fn answer_with_quality_is_persisted() {
  let store = Arc::new(MemoryStore::new());
  let (status, body) = call(
    app(&store, 1),
    "POST",
    "/answers",
    Some(json!({ "item_id": "privet", "quality": 4 })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["first_answer"], true);
  assert_eq!(body["quality"], 4);
  assert_eq!(body["state"]["interval_days"], 1);
  assert_eq!(body["state"]["next_review_date"], "2025-07-02");
  assert_eq!(body["progress"]["learned_words"], 1);

  assert!(store.get_state("privet").await.unwrap().is_some());

  // Due the next day, listed before new items in review-first mode.
  let (_, plan) = call(app(&store, 2), "GET", "/plan", None).await;
  assert_eq!(plan["review_count"], 1);
  assert_eq!(plan["queue"][0]["kind"], "review");
  assert_eq!(plan["queue"][0]["item"]["id"], "privet");
}

#[tokio::test]
async fn answer_with_outcome_maps_to_quality() {
  let store = Arc::new(MemoryStore::new());
  let (status, body) = call(
    app(&store, 1),
    "POST",
    "/answers",
    Some(json!({ "item_id": "da", "outcome": "unknown" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["quality"], 1);
  assert_eq!(body["state"]["repetition_count"], 0);
  assert_eq!(body["state"]["correct_answers"], 0);
}

#[tokio::test]
async fn out_of_range_quality_is_400() {
  let store = Arc::new(MemoryStore::new());
  for bad in [json!(6), json!(-1)] {
    let (status, _) = call(
      app(&store, 1),
      "POST",
      "/answers",
      Some(json!({ "item_id": "da", "quality": bad })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }
  assert!(store.list_states().await.unwrap().is_empty());
}

#[tokio::test]
async fn ambiguous_or_missing_grade_is_400() {
  let store = Arc::new(MemoryStore::new());
  let bodies = [
    json!({ "item_id": "da" }),
    json!({ "item_id": "da", "quality": 3, "outcome": "correct" }),
    json!({ "item_id": "da", "outcome": "maybe" }),
  ];
  for body in bodies {
    let (status, _) = call(app(&store, 1), "POST", "/answers", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }
}

#[tokio::test]
async fn answer_for_unknown_item_is_404() {
  let store = Arc::new(MemoryStore::new());
  let (status, _) = call(
    app(&store, 1),
    "POST",
    "/answers",
    Some(json!({ "item_id": "nyet", "quality": 5 })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Progress ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn progress_and_stats_reflect_answers() {
  let store = Arc::new(MemoryStore::new());
  for (id, q) in [("privet", 5), ("spasibo", 2)] {
    call(app(&store, 1), "POST", "/answers", Some(json!({ "item_id": id, "quality": q }))).await;
  }

  let (status, progress) = call(app(&store, 1), "GET", "/progress/today", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(progress["learned_words"], 2);
  assert_eq!(progress["total_words"], 2);

  let (_, stats) = call(app(&store, 1), "GET", "/stats", None).await;
  assert_eq!(stats["total_words"], 2);
  assert_eq!(stats["average_accuracy"], 50);
  assert_eq!(stats["study_days"], 1);

  let (_, states) = call(app(&store, 1), "GET", "/states", None).await;
  assert_eq!(states.as_array().unwrap().len(), 2);
}

// ── Store failures ──────────────────────────────────────────────────────────

/// A store whose backing database is gone.
struct UnavailableStore;

fn unavailable() -> std::io::Error {
  std::io::Error::new(std::io::ErrorKind::NotConnected, "database unavailable")
}

impl ReviewStore for UnavailableStore {
  type Error = std::io::Error;

  async fn get_state(&self, _: &str) -> Result<Option<ReviewState>, Self::Error> { Ok(None) }

  async fn list_states(&self) -> Result<Vec<ReviewState>, Self::Error> { Err(unavailable()) }

  async fn put_state(&self, _: ReviewState) -> Result<(), Self::Error> { Err(unavailable()) }

  async fn today_progress(&self, _: NaiveDate) -> Result<DailyProgress, Self::Error> {
    Err(unavailable())
  }

  async fn update_today_progress(
    &self,
    _: NaiveDate,
    _: ProgressPatch,
  ) -> Result<DailyProgress, Self::Error> {
    Err(unavailable())
  }

  async fn study_days(&self) -> Result<usize, Self::Error> { Err(unavailable()) }

  async fn commit_answer(
    &self,
    _: ReviewState,
    _: NaiveDate,
    _: ProgressPatch,
  ) -> Result<DailyProgress, Self::Error> {
    Err(unavailable())
  }
}

fn unavailable_app() -> Router {
  let session = StudySession::new(Arc::new(UnavailableStore), catalog(), UserSettings::default())
    .with_clock(FixedClock(day(1)));
  api_router(session)
}

#[tokio::test]
async fn store_failure_on_answer_is_500() {
  let (status, body) = call(
    unavailable_app(),
    "POST",
    "/answers",
    Some(json!({ "item_id": "privet", "quality": 4 })),
  )
  .await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(body["error"].as_str().unwrap().contains("database unavailable"));
}

#[tokio::test]
async fn store_failure_on_reads_is_500() {
  for uri in ["/plan", "/states", "/progress/today", "/stats"] {
    let (status, _) = call(unavailable_app(), "GET", uri, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
  }
}
