//! `mendr ask`: answer one question from the command line.

use anyhow::{bail, Result};
use console::style;

use mendr_types::healing::HealingResult;

use crate::state::AppState;

pub async fn ask(state: &AppState, query: &str, json: bool) -> Result<()> {
    if query.trim().is_empty() {
        bail!("query must not be empty");
    }

    let result = state.orchestrator.ask(query).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_result(&result);
    Ok(())
}

fn print_result(result: &HealingResult) {
    println!();
    println!("  {}", result.answer);
    println!();

    let status = if !result.succeeded() {
        style("exhausted".to_string()).red()
    } else if result.healing_attempts == 0 {
        style("first try".to_string()).green()
    } else {
        style(format!("healed after {} attempt(s)", result.healing_attempts)).yellow()
    };

    println!(
        "  {} {}  {} {:.2}  {} {:.2}s",
        style("status").dim(),
        status,
        style("confidence").dim(),
        result.confidence,
        style("took").dim(),
        result.duration_seconds,
    );
    println!();
}
