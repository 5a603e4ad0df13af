//! [`SqliteStore`], the SQLite implementation of [`ReviewStore`].

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::OptionalExtension as _;

use babieta_core::{
  progress::{DailyProgress, ProgressPatch},
  review::ReviewState,
  store::ReviewStore,
};

use crate::{
  Result,
  encode::{RawProgress, RawReviewState, encode_date},
  schema::SCHEMA,
};

const UPSERT_STATE: &str = "INSERT OR REPLACE INTO review_states (
     item_id, repetition_count, interval_days, easiness_factor,
     next_review_date, last_review_date, total_reviews, correct_answers
   ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

// Single statement so concurrent patches for the same day add up.
const MERGE_PROGRESS: &str =
  "INSERT INTO daily_progress (date, learned_words, review_words, total_words)
   VALUES (?1, ?2, ?3, ?4)
   ON CONFLICT(date) DO UPDATE SET
     learned_words = learned_words + excluded.learned_words,
     review_words  = review_words  + excluded.review_words,
     total_words   = total_words   + excluded.total_words
   RETURNING date, learned_words, review_words, total_words";

fn upsert_state(conn: &rusqlite::Connection, raw: &RawReviewState) -> rusqlite::Result<usize> {
  conn.execute(
    UPSERT_STATE,
    rusqlite::params![
      raw.item_id,
      raw.repetition_count,
      raw.interval_days,
      raw.easiness_factor,
      raw.next_review_date,
      raw.last_review_date,
      raw.total_reviews,
      raw.correct_answers,
    ],
  )
}

fn merge_progress(
  conn: &rusqlite::Connection,
  date: &str,
  patch: &ProgressPatch,
) -> rusqlite::Result<RawProgress> {
  conn.query_row(
    MERGE_PROGRESS,
    rusqlite::params![date, patch.learned_words, patch.review_words, patch.total_words],
    RawProgress::from_row,
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Babieta review store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ReviewStore impl ────────────────────────────────────────────────────────

impl ReviewStore for SqliteStore {
  type Error = crate::Error;

  // ── Review states ─────────────────────────────────────────────────────────

  async fn get_state(&self, item_id: &str) -> Result<Option<ReviewState>> {
    let id = item_id.to_owned();

    let raw: Option<RawReviewState> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM review_states WHERE item_id = ?1",
                RawReviewState::COLUMNS
              ),
              rusqlite::params![id],
              RawReviewState::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawReviewState::into_state).transpose()
  }

  async fn list_states(&self) -> Result<Vec<ReviewState>> {
    let raws: Vec<RawReviewState> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM review_states ORDER BY item_id",
          RawReviewState::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawReviewState::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReviewState::into_state).collect()
  }

  async fn put_state(&self, state: ReviewState) -> Result<()> {
    state.validate()?;
    let raw = RawReviewState::from_state(&state);

    self
      .conn
      .call(move |conn| {
        upsert_state(conn, &raw)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Daily progress ────────────────────────────────────────────────────────

  async fn today_progress(&self, today: NaiveDate) -> Result<DailyProgress> {
    let date_str = encode_date(today);

    let raw: Option<RawProgress> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT date, learned_words, review_words, total_words
               FROM daily_progress WHERE date = ?1",
              rusqlite::params![date_str],
              RawProgress::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    match raw {
      Some(raw) => raw.into_progress(),
      None => Ok(DailyProgress::empty(today)),
    }
  }

  async fn update_today_progress(
    &self,
    today: NaiveDate,
    patch: ProgressPatch,
  ) -> Result<DailyProgress> {
    let date_str = encode_date(today);

    let raw: RawProgress = self
      .conn
      .call(move |conn| Ok(merge_progress(conn, &date_str, &patch)?))
      .await?;

    raw.into_progress()
  }

  async fn study_days(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM daily_progress", [], |r| r.get(0))?)
      })
      .await?;

    Ok(usize::try_from(count).unwrap_or_default())
  }

  // ── Answers ───────────────────────────────────────────────────────────────

  async fn commit_answer(
    &self,
    state: ReviewState,
    today: NaiveDate,
    patch: ProgressPatch,
  ) -> Result<DailyProgress> {
    state.validate()?;
    let raw = RawReviewState::from_state(&state);
    let date_str = encode_date(today);

    let progress: RawProgress = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        upsert_state(&tx, &raw)?;
        let progress = merge_progress(&tx, &date_str, &patch)?;
        tx.commit()?;
        Ok(progress)
      })
      .await?;

    progress.into_progress()
  }
}
