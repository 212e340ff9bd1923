//! The `levelup list` commands.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Subcommand;
use comfy_table::{Cell, Table};

use levelup_core::snapshot::{export_list, import_list};

use super::Context;

#[derive(Subcommand)]
pub enum ListAction {
    /// Create a list, or update its words and sentences
    Add {
        student: String,
        name: String,

        /// Comma-separated words
        #[arg(long)]
        words: Option<String>,

        /// Comma-separated example sentences, one per word
        #[arg(long)]
        sentences: Option<String>,
    },

    /// Show a student's lists
    Show { student: String },

    /// Archive a list, or bring an archived one back
    Toggle { student: String, name: String },

    /// Delete a list
    Remove { student: String, name: String },

    /// Write a list as a shareable document
    Export {
        student: String,
        name: String,

        /// Output file (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Import a shared list document
    Import { student: String, file: PathBuf },
}

pub fn execute(ctx: &Context, action: ListAction) -> Result<()> {
    let mut data = ctx.load_data()?;

    match action {
        ListAction::Add {
            student,
            name,
            words,
            sentences,
        } => {
            let s = data.student_mut(&student)?;
            s.create_list(&name)?;
            let name = name.trim();
            if let Some(words) = words {
                s.set_words(name, &words)?;
            }
            if let Some(sentences) = sentences {
                s.set_sentences(name, &sentences)?;
            }
            println!("Saved list {name} ({} words).", s.list(name)?.words.len());
        }
        ListAction::Show { student } => {
            let s = data.student(&student)?;
            if s.lists.is_empty() {
                println!("{student} has no lists yet.");
                return Ok(());
            }
            let mut table = Table::new();
            table.set_header(vec!["List", "Words", "Sentences", "Status"]);
            for (name, list) in &s.lists {
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(list.words.join(", ")),
                    Cell::new(list.sentences.len()),
                    Cell::new(if list.hidden { "archived" } else { "active" }),
                ]);
            }
            println!("{table}");
            return Ok(());
        }
        ListAction::Toggle { student, name } => {
            let hidden = data.student_mut(&student)?.toggle_hidden(&name)?;
            let state = if hidden { "archived" } else { "active" };
            println!("List {name} is now {state}.");
        }
        ListAction::Remove { student, name } => {
            data.student_mut(&student)?.delete_list(&name)?;
            println!("Deleted list {name}.");
        }
        ListAction::Export { student, name, out } => {
            let doc = export_list(data.student(&student)?, &name)?;
            let json = serde_json::to_string_pretty(&doc)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Exported {name} to {}", path.display());
                }
                None => println!("{json}"),
            }
            return Ok(());
        }
        ListAction::Import { student, file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let name = import_list(data.student_mut(&student)?, &raw)?;
            println!("Imported list {name}.");
        }
    }

    ctx.save_data(&data)
}
