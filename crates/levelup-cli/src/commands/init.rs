//! The `levelup init` command.

use std::path::Path;

use anyhow::{Context as _, Result};

use levelup_store::config::sample_config;

pub fn execute() -> Result<()> {
    let path = Path::new("levelup.toml");
    if path.exists() {
        println!("levelup.toml already exists, skipping.");
    } else {
        std::fs::write(path, sample_config()?).context("failed to write levelup.toml")?;
        println!("Created levelup.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: levelup student add Maya");
    println!("  2. Run: levelup list add Maya animals --words \"cat, dog, fish\"");
    println!("  3. Run: levelup practice Maya");

    Ok(())
}
