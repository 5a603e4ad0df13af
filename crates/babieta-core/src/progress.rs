//! Daily progress aggregates and lifetime study statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{review::ReviewState, scheduler};

// ─── Daily progress ──────────────────────────────────────────────────────────

/// Per-day counters, keyed by calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
  pub date:          NaiveDate,
  /// Items answered for the first time today.
  pub learned_words: u32,
  /// Answers to items that already had a review state.
  pub review_words:  u32,
  /// All answers today.
  pub total_words:   u32,
}

impl DailyProgress {
  pub fn empty(date: NaiveDate) -> Self {
    Self { date, learned_words: 0, review_words: 0, total_words: 0 }
  }

  /// Add the patch's increments to this record.
  pub fn apply(&mut self, patch: &ProgressPatch) {
    self.learned_words = self.learned_words.saturating_add(patch.learned_words);
    self.review_words = self.review_words.saturating_add(patch.review_words);
    self.total_words = self.total_words.saturating_add(patch.total_words);
  }
}

/// Increments merged into a [`DailyProgress`] record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressPatch {
  pub learned_words: u32,
  pub review_words:  u32,
  pub total_words:   u32,
}

impl ProgressPatch {
  /// The patch for one answer: a first answer counts as learned, any later
  /// answer as a review.
  pub fn for_answer(first_answer: bool) -> Self {
    Self {
      learned_words: u32::from(first_answer),
      review_words:  u32::from(!first_answer),
      total_words:   1,
    }
  }
}

// ─── Lifetime statistics ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyStatistics {
  /// Items that have a review state.
  pub total_words:      usize,
  pub mastered_words:   usize,
  /// Mean per-item accuracy, as a rounded percentage.
  pub average_accuracy: u8,
  /// Days with any recorded progress.
  pub study_days:       usize,
}

impl StudyStatistics {
  pub fn compute(states: &[ReviewState], study_days: usize) -> Self {
    let total_words = states.len();
    let mastered_words = states.iter().filter(|s| scheduler::is_mastered(s)).count();

    let average_accuracy = if total_words == 0 {
      0
    } else {
      let sum: f64 = states
        .iter()
        .map(|s| f64::from(s.correct_answers) / f64::from(s.total_reviews.max(1)))
        .sum();
      (sum / total_words as f64 * 100.0).round().clamp(0.0, 100.0) as u8
    };

    Self { total_words, mastered_words, average_accuracy, study_days }
  }
}
