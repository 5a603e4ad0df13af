//! Learner preferences that influence how a day's queue is assembled.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Order in which review and new items are presented.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReviewMode {
  /// Alternate review and new items.
  #[default]
  Mixed,
  ReviewFirst,
  NewFirst,
}

/// Explicitly passed settings; there is no process-wide settings object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
  /// Cap on never-seen items introduced per day.
  pub daily_new_words: usize,
  pub review_mode:     ReviewMode,
}

impl Default for UserSettings {
  fn default() -> Self {
    Self {
      daily_new_words: 10,
      review_mode:     ReviewMode::Mixed,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let s = UserSettings::default();
    assert_eq!(s.daily_new_words, 10);
    assert_eq!(s.review_mode, ReviewMode::Mixed);
  }

  #[test]
  fn partial_settings_fill_in_defaults() {
    let s: UserSettings = serde_json::from_str(r#"{"review_mode":"new_first"}"#).unwrap();
    assert_eq!(s.review_mode, ReviewMode::NewFirst);
    assert_eq!(s.daily_new_words, 10);
  }

  #[test]
  fn review_mode_parses_from_config_strings() {
    assert_eq!("review_first".parse::<ReviewMode>().unwrap(), ReviewMode::ReviewFirst);
    assert!("sometimes".parse::<ReviewMode>().is_err());
  }
}
