//! SM-2 spaced-repetition scheduling.
//!
//! Every function here is pure: the result depends only on the arguments.
//! "Today" is always passed in by the caller (see [`crate::clock`]).
//!
//! A passing answer (quality ≥ 3) revises the easiness factor
//!
//! ```text
//! EF' = max(1.3, EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)))
//! ```
//!
//! and grows the interval 1 → 6 → round(interval × EF'). A lapse resets the
//! streak and the interval but leaves EF untouched.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};

use crate::{
  item::VocabularyItem,
  review::{Quality, ReviewState},
};

/// Interval after the first passing answer, and after any lapse.
pub const INITIAL_INTERVAL: u32 = 1;
/// Interval after the second consecutive passing answer.
pub const SECOND_INTERVAL: u32 = 6;
pub const MIN_EASINESS_FACTOR: f64 = 1.3;
pub const DEFAULT_EASINESS_FACTOR: f64 = 2.5;

const MASTERY_MIN_REPETITIONS: u32 = 5;
const MASTERY_MIN_ACCURACY: f64 = 0.8;
const MASTERY_MIN_INTERVAL: u32 = 30;

// ─── Queue building ──────────────────────────────────────────────────────────

/// States whose next review falls on or before `as_of`, in input order.
pub fn due_for_review(states: &[ReviewState], as_of: NaiveDate) -> Vec<&ReviewState> {
  states
    .iter()
    .filter(|s| s.next_review_date <= as_of)
    .collect()
}

/// Up to `max_count` catalog items that have never been studied, in catalog
/// order. Deterministic so the introduction order is the same every session.
pub fn select_new_items<'a>(
  catalog: &'a [VocabularyItem],
  already_seen: &HashSet<String>,
  max_count: usize,
) -> Vec<&'a VocabularyItem> {
  catalog
    .iter()
    .filter(|item| !already_seen.contains(&item.id))
    .take(max_count)
    .collect()
}

// ─── State transitions ───────────────────────────────────────────────────────

/// Fresh state for an item answered for the first time.
pub fn initialize(item_id: impl Into<String>, today: NaiveDate) -> ReviewState {
  ReviewState {
    item_id:          item_id.into(),
    repetition_count: 0,
    interval_days:    INITIAL_INTERVAL,
    easiness_factor:  DEFAULT_EASINESS_FACTOR,
    next_review_date: add_days(today, INITIAL_INTERVAL),
    last_review_date: Some(today),
    total_reviews:    0,
    correct_answers:  0,
  }
}

/// Derive the state that follows answering `state` with `quality` on `today`.
pub fn record_answer(state: &ReviewState, quality: Quality, today: NaiveDate) -> ReviewState {
  let mut next = state.clone();

  next.total_reviews = next.total_reviews.saturating_add(1);
  if quality.is_passing() {
    next.correct_answers = next.correct_answers.saturating_add(1);
  }

  if !quality.is_passing() {
    // Lapse: easiness and last_review_date stay as they were.
    next.repetition_count = 0;
    next.interval_days = INITIAL_INTERVAL;
    next.next_review_date = add_days(today, INITIAL_INTERVAL);
    return next;
  }

  next.easiness_factor = revised_easiness(state.easiness_factor, quality);
  next.repetition_count = next.repetition_count.saturating_add(1);
  next.interval_days = match next.repetition_count {
    1 => INITIAL_INTERVAL,
    2 => SECOND_INTERVAL,
    // Float-to-int `as` saturates, so runaway intervals cap at u32::MAX.
    _ => ((f64::from(state.interval_days) * next.easiness_factor).round() as u32)
      .max(INITIAL_INTERVAL),
  };
  next.next_review_date = add_days(today, next.interval_days);
  next.last_review_date = Some(today);

  next
}

fn revised_easiness(ef: f64, quality: Quality) -> f64 {
  let miss = f64::from(Quality::MAX - quality.value());
  (ef + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASINESS_FACTOR)
}

/// Saturates at the last representable date instead of overflowing.
fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
  date
    .checked_add_days(Days::new(u64::from(days)))
    .unwrap_or(NaiveDate::MAX)
}

// ─── Derived metrics ─────────────────────────────────────────────────────────

/// Informational 0–100 score: half accuracy, half streak length.
pub fn mastery_level(state: &ReviewState) -> u8 {
  let Some(accuracy) = state.accuracy() else {
    return 0;
  };
  let stability = state.repetition_count.saturating_mul(10).min(50);
  (accuracy * 50.0 + f64::from(stability)).round().min(100.0) as u8
}

/// Long streak, high accuracy and a month-plus interval, all at once.
pub fn is_mastered(state: &ReviewState) -> bool {
  let Some(accuracy) = state.accuracy() else {
    return false;
  };
  state.repetition_count >= MASTERY_MIN_REPETITIONS
    && accuracy >= MASTERY_MIN_ACCURACY
    && state.interval_days >= MASTERY_MIN_INTERVAL
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2025, 7, d).unwrap() }

  fn q(v: u8) -> Quality { Quality::new(v).unwrap() }

  fn with_next_review(id: &str, next: NaiveDate) -> ReviewState {
    let mut s = initialize(id, day(1));
    s.next_review_date = next;
    s
  }

  // ── due_for_review ──────────────────────────────────────────────────────────

  #[test]
  fn due_includes_today_and_excludes_tomorrow() {
    let today = day(10);
    let states = vec![
      with_next_review("past", day(3)),
      with_next_review("today", today),
      with_next_review("tomorrow", day(11)),
    ];

    let due: Vec<_> = due_for_review(&states, today)
      .into_iter()
      .map(|s| s.item_id.as_str())
      .collect();
    assert_eq!(due, vec!["past", "today"]);
  }

  #[test]
  fn due_preserves_input_order() {
    let states = vec![
      with_next_review("c", day(2)),
      with_next_review("a", day(1)),
      with_next_review("b", day(3)),
    ];
    let due: Vec<_> = due_for_review(&states, day(5))
      .into_iter()
      .map(|s| s.item_id.as_str())
      .collect();
    assert_eq!(due, vec!["c", "a", "b"]);
  }

  #[test]
  fn due_on_empty_input_is_empty() {
    assert!(due_for_review(&[], day(1)).is_empty());
  }

  // ── select_new_items ────────────────────────────────────────────────────────

  fn catalog(ids: &[&str]) -> Vec<VocabularyItem> {
    ids
      .iter()
      .map(|id| VocabularyItem::new(*id, id.to_uppercase(), *id))
      .collect()
  }

  fn ids<'a>(items: &[&'a VocabularyItem]) -> Vec<&'a str> {
    items.iter().map(|i| i.id.as_str()).collect()
  }

  #[test]
  fn selects_first_unseen_items_in_catalog_order() {
    let items = catalog(&["A", "B", "C", "D", "E"]);
    let picked = select_new_items(&items, &HashSet::new(), 3);
    assert_eq!(ids(&picked), vec!["A", "B", "C"]);
  }

  #[test]
  fn skips_seen_items() {
    let items = catalog(&["A", "B", "C", "D", "E"]);
    let seen: HashSet<String> = ["A".to_string(), "C".to_string()].into();
    let picked = select_new_items(&items, &seen, 2);
    assert_eq!(ids(&picked), vec!["B", "D"]);
  }

  #[test]
  fn zero_cap_selects_nothing() {
    let items = catalog(&["A", "B"]);
    assert!(select_new_items(&items, &HashSet::new(), 0).is_empty());
  }

  #[test]
  fn cap_larger_than_unseen_returns_all_unseen() {
    let items = catalog(&["A", "B", "C"]);
    let seen: HashSet<String> = ["B".to_string()].into();
    let picked = select_new_items(&items, &seen, 10);
    assert_eq!(ids(&picked), vec!["A", "C"]);
  }

  // ── initialize ──────────────────────────────────────────────────────────────

  #[test]
  fn initialize_sets_defaults() {
    let s = initialize("w1", day(4));
    assert_eq!(s.item_id, "w1");
    assert_eq!(s.repetition_count, 0);
    assert_eq!(s.interval_days, 1);
    assert_eq!(s.easiness_factor, 2.5);
    assert_eq!(s.next_review_date, day(5));
    assert_eq!(s.last_review_date, Some(day(4)));
    assert_eq!(s.total_reviews, 0);
    assert_eq!(s.correct_answers, 0);
  }

  // ── record_answer ───────────────────────────────────────────────────────────

  #[test]
  fn two_good_answers_follow_one_then_six_days() {
    let d = day(1);
    let state = initialize("w1", d);

    let first = record_answer(&state, q(4), d);
    assert_eq!(first.repetition_count, 1);
    assert_eq!(first.interval_days, 1);
    assert_eq!(first.next_review_date, day(2));
    assert_eq!(first.last_review_date, Some(d));

    let second = record_answer(&first, q(4), day(2));
    assert_eq!(second.repetition_count, 2);
    assert_eq!(second.interval_days, 6);
    assert_eq!(second.next_review_date, day(8));
    assert_eq!(second.total_reviews, 2);
    assert_eq!(second.correct_answers, 2);
  }

  #[test]
  fn perfect_answers_grow_interval_by_easiness() {
    let d = day(1);
    let mut s = initialize("w1", d);
    let mut intervals = Vec::new();
    for _ in 0..3 {
      s = record_answer(&s, q(5), d);
      intervals.push(s.interval_days);
      assert!(s.easiness_factor > 2.5);
    }
    // EF after three perfect answers: 2.5 + 3 × 0.1
    assert!((s.easiness_factor - 2.8).abs() < 1e-9);
    assert_eq!(intervals, vec![1, 6, (6.0 * s.easiness_factor).round() as u32]);
    assert_eq!(intervals[2], 17);
  }

  #[test]
  fn quality_four_keeps_easiness_and_three_lowers_it() {
    let s = initialize("w1", day(1));
    let four = record_answer(&s, q(4), day(1));
    assert!((four.easiness_factor - 2.5).abs() < 1e-9);

    let three = record_answer(&s, q(3), day(1));
    assert!((three.easiness_factor - 2.36).abs() < 1e-9);
  }

  #[test]
  fn lapse_resets_streak_and_interval_but_keeps_easiness() {
    let mut s = initialize("w1", day(1));
    for _ in 0..4 {
      s = record_answer(&s, q(5), day(1));
    }
    let ef_before = s.easiness_factor;
    let last_before = s.last_review_date;
    assert!(s.repetition_count == 4 && s.interval_days > 6);

    let lapsed = record_answer(&s, q(0), day(20));
    assert_eq!(lapsed.repetition_count, 0);
    assert_eq!(lapsed.interval_days, 1);
    assert_eq!(lapsed.next_review_date, day(21));
    assert_eq!(lapsed.easiness_factor, ef_before);
    assert_eq!(lapsed.last_review_date, last_before);
    assert_eq!(lapsed.total_reviews, 5);
    assert_eq!(lapsed.correct_answers, 4);
  }

  #[test]
  fn lapse_from_fresh_state() {
    let s = initialize("w1", day(1));
    let lapsed = record_answer(&s, q(2), day(1));
    assert_eq!(lapsed.repetition_count, 0);
    assert_eq!(lapsed.interval_days, 1);
    assert_eq!(lapsed.total_reviews, 1);
    assert_eq!(lapsed.correct_answers, 0);
  }

  #[test]
  fn input_state_is_not_mutated() {
    let s = initialize("w1", day(1));
    let copy = s.clone();
    let _ = record_answer(&s, q(5), day(1));
    assert_eq!(s, copy);
  }

  #[test]
  fn easiness_never_drops_below_minimum() {
    let mut s = initialize("w1", day(1));
    for _ in 0..20 {
      s = record_answer(&s, q(3), day(1));
      assert!(s.easiness_factor >= MIN_EASINESS_FACTOR);
    }
    assert_eq!(s.easiness_factor, MIN_EASINESS_FACTOR);
  }

  #[test]
  fn every_grade_preserves_invariants() {
    for first in 0..=5u8 {
      for second in 0..=5u8 {
        let s = initialize("w1", day(1));
        let s = record_answer(&s, q(first), day(1));
        let s = record_answer(&s, q(second), day(2));
        assert!(s.validate().is_ok(), "grades {first},{second}: {s:?}");
        assert!(s.correct_answers <= s.total_reviews);
        assert!(s.interval_days >= 1);
      }
    }
  }

  #[test]
  fn runaway_interval_saturates() {
    let mut s = initialize("w1", day(1));
    s.repetition_count = 40;
    s.interval_days = u32::MAX / 2;
    let next = record_answer(&s, q(5), day(1));
    assert_eq!(next.interval_days, u32::MAX);
    assert_eq!(next.next_review_date, NaiveDate::MAX);
  }

  // ── mastery ─────────────────────────────────────────────────────────────────

  fn stats(reps: u32, interval: u32, total: u32, correct: u32) -> ReviewState {
    let mut s = initialize("w1", day(1));
    s.repetition_count = reps;
    s.interval_days = interval;
    s.total_reviews = total;
    s.correct_answers = correct;
    s
  }

  #[test]
  fn mastery_level_of_unreviewed_state_is_zero() {
    assert_eq!(mastery_level(&initialize("w1", day(1))), 0);
  }

  #[test]
  fn mastery_level_combines_accuracy_and_streak() {
    // 3/4 accuracy → 37.5, two reps → 20; rounds to 58
    assert_eq!(mastery_level(&stats(2, 6, 4, 3)), 58);
    // streak bonus caps at 50
    assert_eq!(mastery_level(&stats(9, 40, 10, 10)), 100);
    assert_eq!(mastery_level(&stats(0, 1, 2, 0)), 0);
  }

  #[test]
  fn fresh_state_is_not_mastered() {
    assert!(!is_mastered(&initialize("w1", day(1))));
  }

  #[test]
  fn mastery_requires_all_three_conditions() {
    assert!(is_mastered(&stats(5, 30, 5, 4)));
    assert!(!is_mastered(&stats(4, 30, 5, 5)));
    assert!(!is_mastered(&stats(5, 29, 5, 5)));
    assert!(!is_mastered(&stats(5, 30, 10, 7)));
  }
}
