pub mod cli;
pub mod config;
pub mod stages;

pub use cli::{Cli, Command};
pub use config::{ConfigError, PipelineConfig};
pub use stages::{EvaluationOutcome, ROC_CURVE_FILE, evaluate_stage, upload_stage};
