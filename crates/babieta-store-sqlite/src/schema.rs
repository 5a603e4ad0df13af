//! SQL schema for the Babieta SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per item that has been answered at least once.
-- Rows are replaced wholesale; columns are never patched individually.
CREATE TABLE IF NOT EXISTS review_states (
    item_id          TEXT PRIMARY KEY,
    repetition_count INTEGER NOT NULL CHECK (repetition_count >= 0),
    interval_days    INTEGER NOT NULL CHECK (interval_days >= 1),
    easiness_factor  REAL    NOT NULL CHECK (easiness_factor >= 1.3),
    next_review_date TEXT    NOT NULL,   -- ISO 8601 calendar date
    last_review_date TEXT,               -- ISO 8601 calendar date or NULL
    total_reviews    INTEGER NOT NULL CHECK (total_reviews >= 0),
    correct_answers  INTEGER NOT NULL CHECK (correct_answers >= 0),
    CHECK (correct_answers <= total_reviews)
);

CREATE TABLE IF NOT EXISTS daily_progress (
    date          TEXT PRIMARY KEY,      -- ISO 8601 calendar date
    learned_words INTEGER NOT NULL DEFAULT 0,
    review_words  INTEGER NOT NULL DEFAULT 0,
    total_words   INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS review_states_due_idx ON review_states(next_review_date);

PRAGMA user_version = 1;
";
