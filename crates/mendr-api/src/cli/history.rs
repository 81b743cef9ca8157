//! `mendr history`: recent entries from the interaction or feedback log.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use mendr_core::repository::{FeedbackRepository, InteractionLogRepository};
use mendr_infra::sqlite::{DatabasePool, SqliteFeedbackStore, SqliteInteractionLog};
use mendr_types::feedback::{FeedbackEntry, FeedbackType};
use mendr_types::healing::InteractionLogEntry;

/// Longest query/response shown before truncating.
const PREVIEW_CHARS: usize = 48;

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// `feedback` switches the listing from the interaction log to the feedback
/// log. Only the database is opened; no model or API key is needed.
pub async fn list_history(
    pool: Option<DatabasePool>,
    limit: i64,
    feedback: bool,
    json: bool,
) -> Result<()> {
    if limit < 1 {
        bail!("limit must be at least 1");
    }

    if pool.is_none() && !json {
        println!();
        println!(
            "  {} Persistence is disabled or the database is unavailable.",
            style("i").blue().bold(),
        );
        println!();
        return Ok(());
    }

    if feedback {
        let store = pool.map(SqliteFeedbackStore::new);
        show_feedback(&store.recent(limit).await?, json)
    } else {
        let log = pool.map(SqliteInteractionLog::new);
        show_interactions(&log.recent(limit).await?, json)
    }
}

fn show_interactions(entries: &[InteractionLogEntry], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!("  {} No interactions yet.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = new_table(["When", "Query", "Response", "Healing", "Confidence"]);

    for entry in entries {
        let outcome = if entry.success {
            Cell::new(format!("{:.2}", entry.confidence)).fg(Color::Green)
        } else {
            Cell::new(format!("{:.2}", entry.confidence)).fg(Color::Red)
        };

        table.add_row(vec![
            timestamp_cell(&entry.created_at),
            Cell::new(preview(&entry.query)).fg(Color::White),
            Cell::new(preview(&entry.response)).fg(Color::White),
            Cell::new(entry.healing_attempts).fg(Color::Yellow),
            outcome,
        ]);
    }

    println!();
    println!("{table}");
    println!();

    Ok(())
}

fn show_feedback(entries: &[FeedbackEntry], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!("  {} No feedback yet.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = new_table(["When", "Query", "Verdict", "Correction"]);

    for entry in entries {
        let verdict = match entry.feedback {
            FeedbackType::ThumbsUp => Cell::new(entry.feedback).fg(Color::Green),
            FeedbackType::ThumbsDown => Cell::new(entry.feedback).fg(Color::Red),
        };
        let correction = entry.corrected_answer.as_deref().map(preview).unwrap_or_default();

        table.add_row(vec![
            timestamp_cell(&entry.created_at),
            Cell::new(preview(&entry.query)).fg(Color::White),
            verdict,
            Cell::new(correction).fg(Color::White),
        ]);
    }

    println!();
    println!("{table}");
    println!();

    Ok(())
}

fn new_table<const N: usize>(header: [&str; N]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.map(|title| Cell::new(title).fg(Color::White)));
    table
}

fn timestamp_cell(at: &DateTime<Utc>) -> Cell {
    Cell::new(at.format("%Y-%m-%d %H:%M:%S").to_string()).fg(Color::DarkGrey)
}
