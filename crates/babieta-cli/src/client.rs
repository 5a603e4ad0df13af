//! Async HTTP client wrapping the babieta JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use babieta_core::{
  progress::{DailyProgress, StudyStatistics},
  review::Quality,
  session::{AnswerRecord, PlanEntry},
};
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;

/// Connection settings for the babieta API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Body of `GET /api/plan`.
#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
  pub date:         NaiveDate,
  pub review_count: usize,
  pub new_count:    usize,
  pub queue:        Vec<PlanEntry>,
}

/// Async HTTP client for the babieta JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    tracing::debug!(path, "GET");
    let resp = self
      .auth(self.client.get(self.url(path)))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    decode(resp, "GET", path).await
  }

  // ── Scheduling ────────────────────────────────────────────────────────────

  /// `GET /api/plan`
  pub async fn plan(&self) -> Result<Plan> { self.get("/plan").await }

  /// `POST /api/answers`
  pub async fn answer(&self, item_id: &str, quality: Quality) -> Result<AnswerRecord> {
    tracing::debug!(item_id, quality = quality.value(), "POST /answers");
    let resp = self
      .auth(self.client.post(self.url("/answers")))
      .json(&json!({ "item_id": item_id, "quality": quality }))
      .send()
      .await
      .context("POST /answers failed")?;
    decode(resp, "POST", "/answers").await
  }

  // ── Progress ──────────────────────────────────────────────────────────────

  /// `GET /api/progress/today`
  pub async fn today_progress(&self) -> Result<DailyProgress> {
    self.get("/progress/today").await
  }

  /// `GET /api/stats`
  pub async fn stats(&self) -> Result<StudyStatistics> { self.get("/stats").await }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn decode<T: DeserializeOwned>(resp: Response, method: &str, path: &str) -> Result<T> {
  let status = resp.status();
  if !status.is_success() {
    let message = resp
      .json::<serde_json::Value>()
      .await
      .ok()
      .and_then(|v| v["error"].as_str().map(str::to_owned))
      .unwrap_or_default();
    return Err(anyhow!("{method} {path} → {status} {message}"));
  }
  resp
    .json()
    .await
    .with_context(|| format!("deserialising {path}"))
}
