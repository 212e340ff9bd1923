//! levelup CLI: spelling quests and memory match in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod console;

use commands::list::ListAction;
use commands::student::StudentAction;
use commands::Context;

#[derive(Parser)]
#[command(
    name = "levelup",
    version,
    about = "Spelling quests and memory match for young learners"
)]
struct Cli {
    /// Data file (overrides LEVELUP_DATA and the config file)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter levelup.toml
    Init,

    /// Manage students
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },

    /// Manage a student's word lists
    List {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Play a spelling round
    Practice {
        student: String,

        /// List to practice (all active lists if omitted)
        #[arg(long)]
        list: Option<String>,

        /// Seed for the word order
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play memory match
    Memory {
        student: String,

        /// List to deal from (all active lists if omitted)
        #[arg(long)]
        list: Option<String>,

        /// Seed for the deck and targets
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show a student's progress
    Stats {
        student: String,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set or clear the preferred speech voice
    Voice { voice: Option<String> },

    /// Write a full backup
    Export {
        /// Output file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace all data with a full backup
    Import { file: PathBuf },
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Init = cli.command {
        return commands::init::execute();
    }

    let ctx = Context::load(cli.data, cli.config)?;
    match cli.command {
        Commands::Init => Ok(()),
        Commands::Student { action } => commands::student::execute(&ctx, action),
        Commands::List { action } => commands::list::execute(&ctx, action),
        Commands::Practice {
            student,
            list,
            seed,
        } => commands::practice::execute(&ctx, student, list, seed).await,
        Commands::Memory {
            student,
            list,
            seed,
        } => commands::memory::execute(&ctx, student, list, seed).await,
        Commands::Stats { student, json } => commands::stats::execute(&ctx, student, json),
        Commands::Voice { voice } => commands::voice::execute(&ctx, voice),
        Commands::Export { out } => commands::export::execute(&ctx, out),
        Commands::Import { file } => commands::import::execute(&ctx, file),
    }
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("levelup=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
