use clap::{Parser, Subcommand};
use diagnosis_storage::StorageProvider;
use std::path::PathBuf;

/// Breast cancer diagnosis pipeline: evaluation and artifact upload
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "diagnosis-pipeline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Results directory (overrides RESULTS_DIR)
    #[arg(long, global = true)]
    pub results_dir: Option<PathBuf>,

    /// Model type recorded in the report (overrides MODEL_TYPE)
    #[arg(long, global = true)]
    pub model_type: Option<String>,

    /// Feature count recorded in the report (overrides FEATURE_COUNT)
    #[arg(long, global = true)]
    pub feature_count: Option<usize>,

    /// Interpretation policy JSON (overrides INTERPRETATION_POLICY)
    #[arg(long, global = true)]
    pub policy: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Compute metrics and write the evaluation report
    Evaluate {
        /// JSON file with `y_true`, `y_pred` and `y_prob`
        #[arg(short, long)]
        predictions: PathBuf,
    },

    /// Upload the results directory to the configured storage
    Upload {
        /// Storage backend (overrides STORAGE_TYPE)
        #[arg(short, long)]
        storage: Option<StorageProvider>,
    },

    /// Evaluate, then upload
    Run {
        #[arg(short, long)]
        predictions: PathBuf,

        #[arg(short, long)]
        storage: Option<StorageProvider>,
    },

    /// Print the JSON schema of the metrics document
    Schema,
}

impl Command {
    pub fn storage(&self) -> Option<StorageProvider> {
        match self {
            Command::Upload { storage } | Command::Run { storage, .. } => *storage,
            _ => None,
        }
    }
}
