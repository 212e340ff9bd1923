//! The `levelup import` command.

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use levelup_core::snapshot::import_full;

use super::Context;

/// Replace all stored data with a full backup.
pub fn execute(ctx: &Context, file: PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let data = import_full(&raw)?;
    ctx.save_data(&data)?;
    println!("Imported {} student(s).", data.students.len());
    Ok(())
}
