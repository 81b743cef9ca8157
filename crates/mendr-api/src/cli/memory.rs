//! `mendr memory list`: show the memory table.
//!
//! Memory lives in the process, so this lists the seeded statements of a
//! fresh start.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use serde_json::json;

use mendr_core::memory::vector::VectorMemory;

pub async fn list_memories(memory: &VectorMemory, json: bool) -> Result<()> {
    let memories = memory.records().await;

    if json {
        let value = json!({
            "count": memories.len(),
            "memories": memories,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if memories.is_empty() {
        println!();
        println!(
            "  {} No memories. Add seed statements under [memory] in config.toml.",
            style("i").blue().bold(),
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Text").fg(Color::White),
    ]);

    for record in &memories {
        table.add_row(vec![
            Cell::new(record.id).fg(Color::DarkGrey),
            Cell::new(&record.text).fg(Color::White),
        ]);
    }

    println!();
    println!("  Memories ({})", style(memory.embedding_model()).cyan());
    println!();
    println!("{table}");
    println!();
    println!(
        "  {} memor{}",
        style(memories.len()).bold(),
        if memories.len() == 1 { "y" } else { "ies" }
    );
    println!();

    Ok(())
}
