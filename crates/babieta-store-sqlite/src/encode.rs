//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Dates are stored as ISO 8601 `YYYY-MM-DD` strings so that lexical order
//! matches chronological order. Counters are stored as INTEGER and checked on
//! the way back into `u32`.

use babieta_core::{progress::DailyProgress, review::ReviewState};
use chrono::NaiveDate;

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Counters ────────────────────────────────────────────────────────────────

pub fn decode_count(column: &'static str, value: i64) -> Result<u32> {
  u32::try_from(value).map_err(|_| Error::OutOfRange { column, value })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `review_states` row.
pub struct RawReviewState {
  pub item_id:          String,
  pub repetition_count: i64,
  pub interval_days:    i64,
  pub easiness_factor:  f64,
  pub next_review_date: String,
  pub last_review_date: Option<String>,
  pub total_reviews:    i64,
  pub correct_answers:  i64,
}

impl RawReviewState {
  pub const COLUMNS: &'static str = "item_id, repetition_count, interval_days, easiness_factor, \
     next_review_date, last_review_date, total_reviews, correct_answers";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_id:          row.get(0)?,
      repetition_count: row.get(1)?,
      interval_days:    row.get(2)?,
      easiness_factor:  row.get(3)?,
      next_review_date: row.get(4)?,
      last_review_date: row.get(5)?,
      total_reviews:    row.get(6)?,
      correct_answers:  row.get(7)?,
    })
  }

  pub fn from_state(s: &ReviewState) -> Self {
    Self {
      item_id:          s.item_id.clone(),
      repetition_count: s.repetition_count.into(),
      interval_days:    s.interval_days.into(),
      easiness_factor:  s.easiness_factor,
      next_review_date: encode_date(s.next_review_date),
      last_review_date: s.last_review_date.map(encode_date),
      total_reviews:    s.total_reviews.into(),
      correct_answers:  s.correct_answers.into(),
    }
  }

  /// Decode and re-validate; a row edited by hand cannot slip past the
  /// scheduler's invariants.
  pub fn into_state(self) -> Result<ReviewState> {
    let state = ReviewState {
      item_id:          self.item_id,
      repetition_count: decode_count("repetition_count", self.repetition_count)?,
      interval_days:    decode_count("interval_days", self.interval_days)?,
      easiness_factor:  self.easiness_factor,
      next_review_date: decode_date(&self.next_review_date)?,
      last_review_date: self.last_review_date.as_deref().map(decode_date).transpose()?,
      total_reviews:    decode_count("total_reviews", self.total_reviews)?,
      correct_answers:  decode_count("correct_answers", self.correct_answers)?,
    };
    state.validate()?;
    Ok(state)
  }
}

/// Raw values read directly from a `daily_progress` row.
pub struct RawProgress {
  pub date:          String,
  pub learned_words: i64,
  pub review_words:  i64,
  pub total_words:   i64,
}

impl RawProgress {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      date:          row.get(0)?,
      learned_words: row.get(1)?,
      review_words:  row.get(2)?,
      total_words:   row.get(3)?,
    })
  }

  pub fn into_progress(self) -> Result<DailyProgress> {
    Ok(DailyProgress {
      date:          decode_date(&self.date)?,
      learned_words: decode_count("learned_words", self.learned_words)?,
      review_words:  decode_count("review_words", self.review_words)?,
      total_words:   decode_count("total_words", self.total_words)?,
    })
  }
}
