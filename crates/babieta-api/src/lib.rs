//! JSON REST API for Babieta.
//!
//! Exposes an axum [`Router`] backed by a [`StudySession`] over any
//! [`ReviewStore`]. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", babieta_api::api_router(session))
//! ```

pub mod answers;
pub mod error;
pub mod items;
pub mod plan;
pub mod progress;

use axum::{
  Router,
  routing::{get, post},
};
use babieta_core::{session::StudySession, store::ReviewStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `session`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(session: StudySession<S>) -> Router<()>
where
  S: ReviewStore + 'static,
{
  Router::new()
    // Catalog
    .route("/items", get(items::list::<S>))
    .route("/items/{id}", get(items::get_one::<S>))
    // Scheduling
    .route("/plan", get(plan::today::<S>))
    .route("/answers", post(answers::create::<S>))
    .route("/states", get(items::states::<S>))
    // Progress
    .route("/progress/today", get(progress::today::<S>))
    .route("/stats", get(progress::stats::<S>))
    .with_state(session)
}

#[cfg(test)]
mod tests;
