//! `babieta`: terminal study client for the Babieta server.
//!
//! # Usage
//!
//! ```
//! babieta --url http://localhost:5240 --user alice --password secret plan
//! babieta --config ~/.config/babieta/config.toml study --limit 20
//! babieta stats
//! ```

mod client;
mod study;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "babieta", about = "Spaced-repetition vocabulary study client")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the babieta server (default: http://localhost:5240).
  #[arg(long, env = "BABIETA_URL")]
  url: Option<String>,

  /// API username.
  #[arg(long, env = "BABIETA_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "BABIETA_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show today's queue.
  Plan,
  /// Work through today's queue interactively.
  Study {
    /// Stop after this many cards.
    #[arg(short, long)]
    limit: Option<usize>,
  },
  /// Show lifetime statistics and today's progress.
  Stats,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// `url`, `username` and `password`, all optional.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

impl ConfigFile {
  fn load(path: &std::path::Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
  }
}

const DEFAULT_URL: &str = "http://localhost:5240";

/// A flag (or its env var) wins over a non-empty config-file value.
fn pick(flag: Option<String>, file: String) -> Option<String> {
  flag.or_else(|| (!file.is_empty()).then_some(file))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg = match &args.config {
    Some(path) => ConfigFile::load(path)?,
    None => ConfigFile::default(),
  };

  let api_config = ApiConfig {
    base_url: pick(args.url, file_cfg.url).unwrap_or_else(|| DEFAULT_URL.to_string()),
    username: pick(args.user, file_cfg.username).unwrap_or_default(),
    password: pick(args.password, file_cfg.password).unwrap_or_default(),
  };

  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::Plan => show_plan(&client).await,
    Command::Study { limit } => study::run(&client, limit).await,
    Command::Stats => show_stats(&client).await,
  }
}

// ─── Read-only commands ───────────────────────────────────────────────────────

async fn show_plan(client: &ApiClient) -> Result<()> {
  let plan = client.plan().await?;
  println!(
    "{}: {} review, {} new",
    plan.date, plan.review_count, plan.new_count
  );
  for entry in &plan.queue {
    let tag = study::kind_label(entry.kind);
    println!("  {tag:<6} {}  {}", entry.item.headword, entry.item.translation);
  }
  Ok(())
}

async fn show_stats(client: &ApiClient) -> Result<()> {
  let stats = client.stats().await?;
  let today = client.today_progress().await?;
  println!("Words studied:    {}", stats.total_words);
  println!("Mastered:         {}", stats.mastered_words);
  println!("Average accuracy: {}%", stats.average_accuracy);
  println!("Study days:       {}", stats.study_days);
  println!(
    "Today ({}):  {} learned, {} reviewed, {} total",
    today.date, today.learned_words, today.review_words, today.total_words
  );
  Ok(())
}
