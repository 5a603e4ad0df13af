//! Study-session controller: builds the day's queue and records answers.
//!
//! This is the only place that combines the pure [`scheduler`] with a
//! [`ReviewStore`]. Each answer is a read-modify-write of one item's state,
//! committed together with its daily-progress patch. Answers to the same item
//! are serialised; answers to different items run concurrently.

use std::{
  collections::{HashMap, HashSet},
  sync::Arc,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
  Error, Result,
  clock::{Clock, SystemClock},
  item::{Catalog, VocabularyItem},
  progress::{DailyProgress, ProgressPatch, StudyStatistics},
  review::{Quality, ReviewState},
  scheduler,
  settings::{ReviewMode, UserSettings},
  store::ReviewStore,
};

// ─── Plan ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
  Review,
  New,
}

/// One card in the day's queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
  pub kind: EntryKind,
  pub item: VocabularyItem,
}

/// What to study on `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
  pub date:   NaiveDate,
  pub mode:   ReviewMode,
  /// Items due for review, in store order.
  pub review: Vec<VocabularyItem>,
  /// Never-studied items, in catalog order.
  pub new:    Vec<VocabularyItem>,
}

impl StudyPlan {
  pub fn total(&self) -> usize { self.review.len() + self.new.len() }

  pub fn is_empty(&self) -> bool { self.total() == 0 }

  /// All entries in presentation order for the plan's [`ReviewMode`].
  pub fn queue(&self) -> Vec<PlanEntry> {
    let review = self.review.iter().map(|item| PlanEntry {
      kind: EntryKind::Review,
      item: item.clone(),
    });
    let new = self.new.iter().map(|item| PlanEntry {
      kind: EntryKind::New,
      item: item.clone(),
    });

    match self.mode {
      ReviewMode::ReviewFirst => review.chain(new).collect(),
      ReviewMode::NewFirst => new.chain(review).collect(),
      ReviewMode::Mixed => {
        let mut out = Vec::with_capacity(self.total());
        let (mut review, mut new) = (review.peekable(), new.peekable());
        while review.peek().is_some() || new.peek().is_some() {
          out.extend(review.next());
          out.extend(new.next());
        }
        out
      }
    }
  }
}

// ─── Answer record ───────────────────────────────────────────────────────────

/// The persisted outcome of one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
  pub state:         ReviewState,
  pub quality:       Quality,
  /// `true` if this was the item's first ever answer.
  pub first_answer:  bool,
  pub mastery_level: u8,
  pub mastered:      bool,
  pub progress:      DailyProgress,
}

/// An item together with its scheduling state, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
  pub item:          VocabularyItem,
  pub state:         Option<ReviewState>,
  pub mastery_level: u8,
  pub mastered:      bool,
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// Drives scheduling for one learner against a store and a catalog.
///
/// Cloning is cheap; all fields are shared, including the per-item answer
/// locks, so clones of one session never interleave answers to an item.
pub struct StudySession<S> {
  store:    Arc<S>,
  catalog:  Arc<Catalog>,
  settings: UserSettings,
  clock:    Arc<dyn Clock>,
  /// One lock per catalog item, held across an answer's read and write.
  locks:    Arc<HashMap<String, Mutex<()>>>,
}

impl<S> Clone for StudySession<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      catalog:  Arc::clone(&self.catalog),
      settings: self.settings.clone(),
      clock:    Arc::clone(&self.clock),
      locks:    Arc::clone(&self.locks),
    }
  }
}

impl<S: ReviewStore> StudySession<S> {
  pub fn new(store: Arc<S>, catalog: Arc<Catalog>, settings: UserSettings) -> Self {
    let locks = catalog
      .items()
      .iter()
      .map(|item| (item.id.clone(), Mutex::new(())))
      .collect();
    Self {
      store,
      catalog,
      settings,
      clock: Arc::new(SystemClock),
      locks: Arc::new(locks),
    }
  }

  /// Replace the system clock, e.g. with a [`crate::clock::FixedClock`].
  pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
    self.clock = Arc::new(clock);
    self
  }

  pub fn today(&self) -> NaiveDate { self.clock.today() }

  pub fn catalog(&self) -> &Catalog { &self.catalog }

  pub fn settings(&self) -> &UserSettings { &self.settings }

  pub fn store(&self) -> &S { &self.store }

  /// Today's due reviews and new introductions.
  pub async fn plan(&self) -> Result<StudyPlan> {
    let today = self.today();
    let states = self.store.list_states().await.map_err(Error::store)?;

    let mut review = Vec::new();
    for state in scheduler::due_for_review(&states, today) {
      match self.catalog.get(&state.item_id) {
        Some(item) => review.push(item.clone()),
        None => tracing::warn!(
          item_id = %state.item_id,
          "review state refers to an item missing from the catalog; skipping"
        ),
      }
    }

    let seen: HashSet<String> = states.into_iter().map(|s| s.item_id).collect();
    let new = scheduler::select_new_items(
      self.catalog.items(),
      &seen,
      self.settings.daily_new_words,
    )
    .into_iter()
    .cloned()
    .collect();

    let plan = StudyPlan { date: today, mode: self.settings.review_mode, review, new };
    tracing::debug!(
      %today,
      review = plan.review.len(),
      new = plan.new.len(),
      "built study plan"
    );
    Ok(plan)
  }

  /// Grade one answer, persist the new state and bump today's progress.
  ///
  /// The state and the progress patch are committed as one unit. On
  /// `Error::Store` neither was written, so the same answer can be retried.
  pub async fn answer(&self, item_id: &str, quality: Quality) -> Result<AnswerRecord> {
    let lock = self
      .locks
      .get(item_id)
      .ok_or_else(|| Error::UnknownItem(item_id.to_owned()))?;
    let _guard = lock.lock().await;
    let today = self.today();

    let existing = self.store.get_state(item_id).await.map_err(Error::store)?;
    let first_answer = existing.is_none();
    let current = existing.unwrap_or_else(|| scheduler::initialize(item_id, today));

    let state = scheduler::record_answer(&current, quality, today);
    let progress = self
      .store
      .commit_answer(state.clone(), today, ProgressPatch::for_answer(first_answer))
      .await
      .map_err(Error::store)?;

    tracing::debug!(
      item_id,
      quality = quality.value(),
      repetitions = state.repetition_count,
      interval = state.interval_days,
      next = %state.next_review_date,
      "recorded answer"
    );

    Ok(AnswerRecord {
      mastery_level: scheduler::mastery_level(&state),
      mastered: scheduler::is_mastered(&state),
      state,
      quality,
      first_answer,
      progress,
    })
  }

  /// Catalog entry plus its current state.
  pub async fn item(&self, item_id: &str) -> Result<ItemView> {
    let item = self
      .catalog
      .get(item_id)
      .cloned()
      .ok_or_else(|| Error::UnknownItem(item_id.to_owned()))?;
    let state = self.store.get_state(item_id).await.map_err(Error::store)?;

    Ok(ItemView {
      mastery_level: state.as_ref().map_or(0, scheduler::mastery_level),
      mastered: state.as_ref().is_some_and(scheduler::is_mastered),
      item,
      state,
    })
  }

  pub async fn states(&self) -> Result<Vec<ReviewState>> {
    self.store.list_states().await.map_err(Error::store)
  }

  pub async fn today_progress(&self) -> Result<DailyProgress> {
    self
      .store
      .today_progress(self.today())
      .await
      .map_err(Error::store)
  }

  pub async fn statistics(&self) -> Result<StudyStatistics> {
    let states = self.store.list_states().await.map_err(Error::store)?;
    let study_days = self.store.study_days().await.map_err(Error::store)?;
    Ok(StudyStatistics::compute(&states, study_days))
  }
}
