//! The `ReviewStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `babieta-store-sqlite`
//! and [`crate::memory::MemoryStore`]). Higher layers (`babieta-api`, the
//! session controller) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  progress::{DailyProgress, ProgressPatch},
  review::ReviewState,
};

/// Durable map of review states by item id, plus daily progress by date.
///
/// Writes are whole-record replacements; the last writer wins. Backends must
/// reject records that fail [`ReviewState::validate`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ReviewStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Review states ─────────────────────────────────────────────────────

  /// The state for `item_id`, or `None` if the item has never been answered.
  fn get_state<'a>(
    &'a self,
    item_id: &'a str,
  ) -> impl Future<Output = Result<Option<ReviewState>, Self::Error>> + Send + 'a;

  /// Every stored state, ordered by item id.
  fn list_states(
    &self,
  ) -> impl Future<Output = Result<Vec<ReviewState>, Self::Error>> + Send + '_;

  /// Insert or fully replace the state for `state.item_id`.
  fn put_state(
    &self,
    state: ReviewState,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Daily progress ────────────────────────────────────────────────────

  /// Progress recorded for `today`; all-zero if nothing was recorded yet.
  fn today_progress(
    &self,
    today: NaiveDate,
  ) -> impl Future<Output = Result<DailyProgress, Self::Error>> + Send + '_;

  /// Merge `patch` into the record for `today` and return the result.
  fn update_today_progress(
    &self,
    today: NaiveDate,
    patch: ProgressPatch,
  ) -> impl Future<Output = Result<DailyProgress, Self::Error>> + Send + '_;

  /// Number of distinct dates with a progress record.
  fn study_days(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Answers ───────────────────────────────────────────────────────────

  /// Replace `state` and merge `patch` into `today`'s progress as one unit.
  ///
  /// Either both writes land or neither does; on error the store is left as
  /// it was before the call.
  fn commit_answer(
    &self,
    state: ReviewState,
    today: NaiveDate,
    patch: ProgressPatch,
  ) -> impl Future<Output = Result<DailyProgress, Self::Error>> + Send + '_;
}
