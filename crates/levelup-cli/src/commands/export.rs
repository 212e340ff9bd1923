//! The `levelup export` command.

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use levelup_core::snapshot::export_full;
use levelup_store::file::BACKUP_FILE_NAME;

use super::Context;

pub fn execute(ctx: &Context, out: Option<PathBuf>) -> Result<()> {
    let data = ctx.load_data()?;
    let out = out.unwrap_or_else(|| PathBuf::from(BACKUP_FILE_NAME));
    std::fs::write(&out, export_full(&data)?)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!(
        "Exported {} student(s) to {}",
        data.students.len(),
        out.display()
    );
    Ok(())
}
