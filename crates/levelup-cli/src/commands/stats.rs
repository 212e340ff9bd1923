//! The `levelup stats` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use levelup_core::statistics::{summarize, trouble_words};

use super::Context;
use crate::console::medal_line;

pub fn execute(ctx: &Context, name: String, json: bool) -> Result<()> {
    let data = ctx.load_data()?;
    let student = data.student(&name)?;
    let summary = summarize(student);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{} {name} the {}", student.emoji, student.role);
    println!(
        "Level {} ({}/100 to next), {} XP",
        summary.level, summary.level_progress, summary.xp
    );
    println!("Medals: {}", medal_line(&summary.medals));
    println!(
        "This week: {}/{} ({}%), goals met: {}",
        summary.weekly_progress, summary.weekly_goal, summary.goal_percent, summary.goal_streak
    );

    if summary.words.is_empty() {
        println!("\nNo words practiced yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Word", "Avg time", "Accuracy", "Correct", "Missed", "Last"]);
    for w in &summary.words {
        table.add_row(vec![
            Cell::new(&w.word),
            Cell::new(
                w.average_secs
                    .map(|s| format!("{s:.1}s"))
                    .unwrap_or_else(|| "-".into()),
            ),
            Cell::new(format!("{}%", w.accuracy)),
            Cell::new(w.correct),
            Cell::new(w.missed),
            Cell::new(w.last_practiced.as_deref().unwrap_or("-")),
        ]);
    }
    println!("\n{table}");

    let trouble = trouble_words(&summary, 5);
    if !trouble.is_empty() {
        let words: Vec<&str> = trouble.iter().map(|w| w.word.as_str()).collect();
        println!("Needs practice: {}", words.join(", "));
    }
    Ok(())
}
