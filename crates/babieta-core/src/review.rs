//! Per-item review state and answer grading.
//!
//! A [`ReviewState`] exists only once an item has been answered. It is never
//! patched field by field: the scheduler derives a new state from the old one
//! and the store replaces the record wholesale.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Error, Result};

// ─── Quality ─────────────────────────────────────────────────────────────────

/// Recall quality on the SM-2 0–5 scale.
///
/// - 0: complete blackout
/// - 1: wrong, but the answer was recognised once shown
/// - 2: wrong, but the answer felt familiar
/// - 3: correct with serious difficulty
/// - 4: correct after hesitation
/// - 5: perfect recall
///
/// Out-of-range values are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Quality(u8);

impl Quality {
  pub const MAX: u8 = 5;
  /// Lowest grade that counts as a successful recall.
  pub const PASSING: u8 = 3;

  pub fn new(value: u8) -> Result<Self> {
    if value > Self::MAX {
      return Err(Error::InvalidQuality(value.into()));
    }
    Ok(Self(value))
  }

  pub fn value(self) -> u8 { self.0 }

  pub fn is_passing(self) -> bool { self.0 >= Self::PASSING }
}

impl TryFrom<i64> for Quality {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> {
    u8::try_from(value)
      .map_err(|_| Error::InvalidQuality(value))
      .and_then(Self::new)
  }
}

impl TryFrom<u8> for Quality {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self> { Self::new(value) }
}

impl From<Quality> for u8 {
  fn from(q: Quality) -> Self { q.0 }
}

// ─── AnswerOutcome ───────────────────────────────────────────────────────────

/// Result of a multiple-choice quiz question, for callers that do not grade
/// on the full 0–5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnswerOutcome {
  Correct,
  Wrong,
  /// The learner gave up without choosing.
  Unknown,
}

impl AnswerOutcome {
  pub fn quality(self) -> Quality {
    match self {
      Self::Correct => Quality(4),
      Self::Wrong => Quality(2),
      Self::Unknown => Quality(1),
    }
  }
}

// ─── ReviewState ─────────────────────────────────────────────────────────────

/// Scheduling statistics for one vocabulary item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
  pub item_id:          String,
  /// Consecutive passing reviews since the last lapse.
  pub repetition_count: u32,
  pub interval_days:    u32,
  pub easiness_factor:  f64,
  pub next_review_date: NaiveDate,
  pub last_review_date: Option<NaiveDate>,
  pub total_reviews:    u32,
  pub correct_answers:  u32,
}

impl ReviewState {
  /// Fraction of passing answers, or `None` before the first review.
  pub fn accuracy(&self) -> Option<f64> {
    (self.total_reviews > 0)
      .then(|| f64::from(self.correct_answers) / f64::from(self.total_reviews))
  }

  /// Check the record invariants. Stores call this before accepting a record.
  pub fn validate(&self) -> Result<()> {
    let reason = if self.item_id.trim().is_empty() {
      Some("empty item id".to_owned())
    } else if !self.easiness_factor.is_finite()
      || self.easiness_factor < crate::scheduler::MIN_EASINESS_FACTOR
    {
      Some(format!("easiness factor {} below minimum", self.easiness_factor))
    } else if self.interval_days < 1 {
      Some("interval must be at least one day".to_owned())
    } else if self.correct_answers > self.total_reviews {
      Some(format!(
        "{} correct answers out of {} reviews",
        self.correct_answers, self.total_reviews
      ))
    } else {
      None
    };

    match reason {
      Some(reason) => Err(Error::InvalidState {
        item_id: self.item_id.clone(),
        reason,
      }),
      None => Ok(()),
    }
  }
}
