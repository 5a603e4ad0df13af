//! Vocabulary items and the read-only catalog that owns them.
//!
//! Items are immutable content. The catalog preserves file order, which is
//! also the order in which unseen items are introduced.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── VocabularyItem ──────────────────────────────────────────────────────────

/// One flashcard's worth of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
  /// Opaque identifier, stable across sessions.
  pub id:                  String,
  #[serde(alias = "word")]
  pub headword:            String,
  pub translation:         String,
  #[serde(default)]
  pub pronunciation:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub example:             Option<String>,
  #[serde(default, alias = "exampleTranslation", skip_serializing_if = "Option::is_none")]
  pub example_translation: Option<String>,
  #[serde(default, alias = "audioUrl", skip_serializing_if = "Option::is_none")]
  pub audio_url:           Option<String>,
  #[serde(default)]
  pub tags:                Vec<String>,
  /// Informational rating; the scheduler never reads it.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub difficulty:          Option<u8>,
}

impl VocabularyItem {
  /// Convenience constructor with all optional fields empty.
  pub fn new(
    id: impl Into<String>,
    headword: impl Into<String>,
    translation: impl Into<String>,
  ) -> Self {
    Self {
      id: id.into(),
      headword: headword.into(),
      translation: translation.into(),
      pronunciation: String::new(),
      example: None,
      example_translation: None,
      audio_url: None,
      tags: Vec::new(),
      difficulty: None,
    }
  }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// The ordered, id-indexed set of all known vocabulary items.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  items: Vec<VocabularyItem>,
  index: HashMap<String, usize>,
}

impl Catalog {
  /// Build a catalog, rejecting empty and duplicate ids.
  pub fn from_items(items: Vec<VocabularyItem>) -> Result<Self> {
    let mut index = HashMap::with_capacity(items.len());
    for (pos, item) in items.iter().enumerate() {
      if item.id.trim().is_empty() {
        return Err(Error::EmptyItemId(pos));
      }
      if index.insert(item.id.clone(), pos).is_some() {
        return Err(Error::DuplicateItem(item.id.clone()));
      }
    }
    Ok(Self { items, index })
  }

  /// Parse a JSON array of items.
  pub fn from_json(raw: &str) -> Result<Self> {
    let items: Vec<VocabularyItem> = serde_json::from_str(raw)?;
    Self::from_items(items)
  }

  pub fn get(&self, id: &str) -> Option<&VocabularyItem> {
    self.index.get(id).map(|&pos| &self.items[pos])
  }

  pub fn contains(&self, id: &str) -> bool { self.index.contains_key(id) }

  pub fn items(&self) -> &[VocabularyItem] { &self.items }

  pub fn len(&self) -> usize { self.items.len() }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }
}
