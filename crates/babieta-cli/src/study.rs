//! Line-based study loop.
//!
//! Each queued card shows its headword, reveals the translation on Enter,
//! then reads a grade and posts it.

use anyhow::{Context, Result};
use babieta_core::{
  item::VocabularyItem,
  review::{AnswerOutcome, Quality},
  session::{AnswerRecord, EntryKind},
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::client::ApiClient;

/// What the learner typed at the grade prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
  Answer(Quality),
  Skip,
  Quit,
}

/// Parse a grade: `0`–`5`, `y`/`n`/`?` for the three outcomes, `s` to skip,
/// `q` to stop.
pub fn parse_grade(input: &str) -> Option<Grade> {
  match input.trim().to_ascii_lowercase().as_str() {
    "y" | "yes" => Some(Grade::Answer(AnswerOutcome::Correct.quality())),
    "n" | "no" => Some(Grade::Answer(AnswerOutcome::Wrong.quality())),
    "?" => Some(Grade::Answer(AnswerOutcome::Unknown.quality())),
    "s" | "skip" => Some(Grade::Skip),
    "q" | "quit" => Some(Grade::Quit),
    other => other.parse::<u8>().ok().and_then(|q| Quality::new(q).ok()).map(Grade::Answer),
  }
}

pub async fn run(client: &ApiClient, limit: Option<usize>) -> Result<()> {
  let plan = client.plan().await?;
  if plan.queue.is_empty() {
    println!("Nothing to study on {}.", plan.date);
    return Ok(());
  }

  let total = limit.map_or(plan.queue.len(), |l| l.min(plan.queue.len()));
  println!(
    "{}: {} review, {} new. Studying {total}.",
    plan.date, plan.review_count, plan.new_count
  );
  println!("Grades: 0-5, y = knew it, n = wrong, ? = no idea, s = skip, q = quit\n");

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  let mut answered = 0usize;

  for (n, entry) in plan.queue.iter().take(total).enumerate() {
    println!("[{}/{total}] ({}) {}", n + 1, kind_label(entry.kind), front(&entry.item));
    if read_line(&mut lines, "  press Enter to reveal").await?.is_none() {
      break;
    }
    println!("  {}", back(&entry.item));

    let grade = loop {
      let Some(input) = read_line(&mut lines, "  grade").await? else {
        break Grade::Quit;
      };
      match parse_grade(&input) {
        Some(grade) => break grade,
        None => println!("  enter 0-5, y, n, ?, s or q"),
      }
    };

    match grade {
      Grade::Quit => break,
      Grade::Skip => continue,
      Grade::Answer(quality) => {
        let record = client.answer(&entry.item.id, quality).await?;
        println!("  {}\n", summary(&record));
        answered += 1;
      }
    }
  }

  let progress = client.today_progress().await?;
  println!(
    "Answered {answered}. Today: {} learned, {} reviewed, {} total.",
    progress.learned_words, progress.review_words, progress.total_words
  );
  Ok(())
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>, prompt: &str) -> Result<Option<String>> {
  use std::io::Write as _;
  print!("{prompt}> ");
  std::io::stdout().flush().ok();
  lines.next_line().await.context("reading stdin")
}

pub fn kind_label(kind: EntryKind) -> &'static str {
  match kind {
    EntryKind::Review => "review",
    EntryKind::New => "new",
  }
}

fn front(item: &VocabularyItem) -> String {
  if item.pronunciation.is_empty() {
    item.headword.clone()
  } else {
    format!("{} [{}]", item.headword, item.pronunciation)
  }
}

fn back(item: &VocabularyItem) -> String {
  match (&item.example, &item.example_translation) {
    (Some(ex), Some(tr)) => format!("{}\n  {ex}\n  {tr}", item.translation),
    (Some(ex), None) => format!("{}\n  {ex}", item.translation),
    _ => item.translation.clone(),
  }
}

fn summary(record: &AnswerRecord) -> String {
  let state = &record.state;
  let days = if state.interval_days == 1 { "day" } else { "days" };
  let mut out = format!(
    "next review {} (in {} {days}), level {}",
    state.next_review_date, state.interval_days, record.mastery_level
  );
  if record.mastered {
    out.push_str(", mastered");
  }
  out
}
