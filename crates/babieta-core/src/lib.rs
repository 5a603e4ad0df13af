//! Vocabulary items, review state, the SM-2 scheduler and the
//! [`store::ReviewStore`] abstraction.
//!
//! No HTTP or database code lives here. [`session::StudySession`] is the
//! entry point for callers that want a day's plan or to record an answer.

// Store impls use native `async fn`; the trait spells out the `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod clock;
pub mod error;
pub mod item;
pub mod memory;
pub mod progress;
pub mod review;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod store;

pub use error::{Error, Result};
