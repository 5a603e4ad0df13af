//! [`MemoryStore`], a non-durable [`ReviewStore`] kept in process memory.
//!
//! Useful for tests, demos, and for running the API without a database file.

use std::{
  collections::BTreeMap,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::NaiveDate;

use crate::{
  Error, Result,
  progress::{DailyProgress, ProgressPatch},
  review::ReviewState,
  store::ReviewStore,
};

#[derive(Default)]
struct Inner {
  states:   BTreeMap<String, ReviewState>,
  progress: BTreeMap<NaiveDate, DailyProgress>,
}

/// Clones share the same maps.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    // A panic while holding the lock cannot leave a half-written record:
    // every mutation is a single insert.
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl ReviewStore for MemoryStore {
  type Error = Error;

  async fn get_state(&self, item_id: &str) -> Result<Option<ReviewState>> {
    Ok(self.lock().states.get(item_id).cloned())
  }

  async fn list_states(&self) -> Result<Vec<ReviewState>> {
    Ok(self.lock().states.values().cloned().collect())
  }

  async fn put_state(&self, state: ReviewState) -> Result<()> {
    state.validate()?;
    self.lock().states.insert(state.item_id.clone(), state);
    Ok(())
  }

  async fn today_progress(&self, today: NaiveDate) -> Result<DailyProgress> {
    Ok(
      self
        .lock()
        .progress
        .get(&today)
        .cloned()
        .unwrap_or_else(|| DailyProgress::empty(today)),
    )
  }

  async fn update_today_progress(
    &self,
    today: NaiveDate,
    patch: ProgressPatch,
  ) -> Result<DailyProgress> {
    let mut inner = self.lock();
    let record = inner
      .progress
      .entry(today)
      .or_insert_with(|| DailyProgress::empty(today));
    record.apply(&patch);
    Ok(record.clone())
  }

  async fn study_days(&self) -> Result<usize> { Ok(self.lock().progress.len()) }

  async fn commit_answer(
    &self,
    state: ReviewState,
    today: NaiveDate,
    patch: ProgressPatch,
  ) -> Result<DailyProgress> {
    state.validate()?;
    let mut inner = self.lock();
    inner.states.insert(state.item_id.clone(), state);
    let record = inner
      .progress
      .entry(today)
      .or_insert_with(|| DailyProgress::empty(today));
    record.apply(&patch);
    Ok(record.clone())
  }
}
