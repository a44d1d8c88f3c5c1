// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `batch` and `split`, and their
// flags.
//
// `batch` flags are all optional so they can override a config
// file: the run starts from `--config` (or the defaults) and
// every flag given on the command line replaces that field.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::batch_use_case::BatchConfig;
use crate::application::split_use_case::SplitConfig;
use crate::data::batcher::LeftoverPolicy;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract (question, context) pairs and pack them into batches
    /// with no repeated context
    Batch(BatchArgs),

    /// Write a seeded train/validation split of record indices
    Split(SplitArgs),
}

/// What to do with pairs stranded behind their own context in the
/// last batch
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeftoversArg {
    /// Close the short batch and start another (nothing is lost)
    Flush,
    /// Leave them out of the batches and list them in summary.json
    Drop,
}

impl From<LeftoversArg> for LeftoverPolicy {
    fn from(a: LeftoversArg) -> Self {
        match a {
            LeftoversArg::Flush => LeftoverPolicy::Flush,
            LeftoversArg::Drop  => LeftoverPolicy::Drop,
        }
    }
}

/// All arguments for the `batch` command
#[derive(Args, Debug, Default)]
pub struct BatchArgs {
    /// JSON config file to start from (e.g. a saved batch_config.json)
    #[arg(long)]
    pub config: Option<String>,

    /// Dataset file: .jsonl/.ndjson rows, a .json array, or SQuAD JSON
    #[arg(long)]
    pub dataset: Option<String>,

    /// Maximum number of pairs per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Record indices to batch, e.g. "0..1000" or "3,8,10..20"
    #[arg(long, conflicts_with = "indices_file")]
    pub indices: Option<String>,

    /// JSON file with an array of record indices (see `split`)
    #[arg(long)]
    pub indices_file: Option<String>,

    /// Record field holding the question
    #[arg(long)]
    pub question_field: Option<String>,

    /// Record field holding the context passage
    #[arg(long)]
    pub context_field: Option<String>,

    /// Normalise whitespace in questions and contexts before batching
    #[arg(long)]
    pub normalize: bool,

    /// Policy for pairs that cannot join the last batch
    #[arg(long, value_enum)]
    pub leftovers: Option<LeftoversArg>,

    /// Directory for batches.json, summary.json and batch_config.json
    #[arg(long)]
    pub output_dir: Option<String>,
}

impl BatchArgs {
    /// Lay the flags given on the command line over `base`.
    pub fn apply(self, mut base: BatchConfig) -> BatchConfig {
        if let Some(v) = self.dataset        { base.dataset = v; }
        if let Some(v) = self.batch_size     { base.batch_size = v; }
        if let Some(v) = self.question_field { base.fields.question = v; }
        if let Some(v) = self.context_field  { base.fields.context = v; }
        if let Some(v) = self.leftovers      { base.leftovers = v.into(); }
        if let Some(v) = self.output_dir     { base.output_dir = v; }

        // An index source on the command line replaces the config's
        if self.indices.is_some() || self.indices_file.is_some() {
            base.indices      = self.indices;
            base.indices_file = self.indices_file;
        }
        if self.normalize {
            base.normalize = true;
        }
        base
    }
}

/// All arguments for the `split` command
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Dataset file to split
    #[arg(long, default_value = "data/train.jsonl")]
    pub dataset: String,

    /// Share of records that go to the training list
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    /// Shuffle seed; the same seed gives the same split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Directory for train_indices.json and val_indices.json
    #[arg(long, default_value = "splits")]
    pub output_dir: String,
}

impl From<SplitArgs> for SplitConfig {
    fn from(a: SplitArgs) -> Self {
        SplitConfig {
            dataset:        a.dataset,
            train_fraction: a.train_fraction,
            seed:           a.seed,
            output_dir:     a.output_dir,
        }
    }
}
