// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and delegates every command to Layer 2 (application).
//
// Two commands are supported:
//   1. `batch` — dataset → unique-passage batches on disk
//   2. `split` — dataset → seeded train/validation index lists
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{BatchArgs, Commands, SplitArgs};

use crate::application::batch_use_case::{BatchConfig, BatchUseCase};
use crate::application::split_use_case::SplitUseCase;
use crate::infra::store::read_json;

#[derive(Parser, Debug)]
#[command(
    name = "passage-batcher",
    version,
    about = "Batch QA (question, context) pairs so no batch repeats a context."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Batch(args) => run_batch(args),
            Commands::Split(args) => run_split(args),
        }
    }
}

fn run_batch(args: BatchArgs) -> Result<()> {
    let base: BatchConfig = match &args.config {
        Some(path) => read_json(path)?,
        None => BatchConfig::default(),
    };
    let config = args.apply(base);

    tracing::info!(
        "Batching '{}' with batch_size={} ({:?} leftovers)",
        config.dataset,
        config.batch_size,
        config.leftovers
    );

    let summary = BatchUseCase::new(config).execute()?;

    println!(
        "{} pairs → {} batches ({} full)",
        summary.stats.pairs_in, summary.stats.batches, summary.stats.full_batches
    );
    if !summary.unplaced.is_empty() {
        println!("{} pairs left unplaced (see summary.json)", summary.unplaced.len());
    }
    Ok(())
}

fn run_split(args: SplitArgs) -> Result<()> {
    let files = SplitUseCase::new(args.into()).execute()?;
    println!("Train indices: {}", files.train.display());
    println!("Val indices:   {}", files.val.display());
    Ok(())
}
