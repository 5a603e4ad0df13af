//! HTTP server wiring for Babieta.
//!
//! Nests the [`babieta_api`] router under `/api`, guards it with optional
//! Basic auth, and adds request tracing.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{Router, middleware, routing::get};
use babieta_core::{item::Catalog, session::StudySession, settings::UserSettings, store::ReviewStore};
use rand_core::OsRng;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `BABIETA_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  pub store_path:         PathBuf,
  pub catalog_path:       PathBuf,
  #[serde(default)]
  pub auth_username:      Option<String>,
  #[serde(default)]
  pub auth_password_hash: Option<String>,
  #[serde(default)]
  pub settings:           UserSettings,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5240 }

impl ServerConfig {
  /// Credentials to enforce, or `None` to serve without auth.
  ///
  /// Setting only one of username and hash is an error rather than a
  /// silently open server.
  pub fn auth(&self) -> Result<Option<AuthConfig>, Error> {
    match (&self.auth_username, &self.auth_password_hash) {
      (Some(username), Some(password_hash)) => Ok(Some(AuthConfig {
        username:      username.clone(),
        password_hash: password_hash.clone(),
      })),
      (None, None) => Ok(None),
      _ => Err(Error::Config(
        "auth_username and auth_password_hash must be set together".to_string(),
      )),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level router: `/health` plus `/api/*`.
pub fn router<S>(session: StudySession<S>, auth: Option<AuthConfig>) -> Router
where
  S: ReviewStore + 'static,
{
  let mut api = babieta_api::api_router(session);
  if let Some(auth) = auth {
    api = api.layer(middleware::from_fn_with_state(Arc::new(auth), require_auth));
  }

  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Read and validate the vocabulary catalog at `path`.
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
  use anyhow::Context as _;
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading catalog {}", path.display()))?;
  let catalog = Catalog::from_json(&raw)
    .with_context(|| format!("parsing catalog {}", path.display()))?;
  Ok(catalog)
}

/// Argon2 PHC string for `password` with a fresh random salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Integration tests ────────────────────────────────────────────────────────
