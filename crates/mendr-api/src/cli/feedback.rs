//! `mendr feedback`: record a verdict, optionally teaching a correction.

use anyhow::Result;
use console::style;
use serde_json::json;

use crate::state::ConcreteFeedbackService;

pub async fn feedback(
    service: &ConcreteFeedbackService,
    query: &str,
    response: &str,
    feedback_type: &str,
    correction: Option<&str>,
    json: bool,
) -> Result<()> {
    let outcome = service
        .record_feedback(query, response, feedback_type, correction)
        .await?;

    if json {
        let value = json!({
            "feedback": outcome.feedback,
            "memory_added": outcome.memory_added,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Recorded {} feedback",
        style("✓").green().bold(),
        style(outcome.feedback).cyan()
    );
    if outcome.memory_added {
        println!(
            "  {} Correction stored in memory for this session",
            style("+").green()
        );
    }
    println!();

    Ok(())
}
