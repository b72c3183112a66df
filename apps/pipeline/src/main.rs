#[cfg(not(any(all(target_os = "macos", target_arch = "aarch64"), target_os = "ios")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use diagnosis_evaluation::EvaluationDocument;
use diagnosis_pipeline::{Cli, Command, PipelineConfig, evaluate_stage, upload_stage};
use dotenv::dotenv;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if matches!(cli.command, Command::Schema) {
        println!("{}", serde_json::to_string_pretty(&EvaluationDocument::json_schema()?)?);
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;
    tracing::info!(
        "Loaded configuration: results={}, model={}, storage={}",
        config.results_dir.display(),
        config.metadata.model_type,
        config.storage.provider()
    );

    let result = match &cli.command {
        Command::Evaluate { predictions } => evaluate_stage(&config, predictions).map(|_| ExitCode::SUCCESS),
        Command::Upload { .. } => upload(&config).await,
        Command::Run { predictions, .. } => match evaluate_stage(&config, predictions) {
            Ok(_) => upload(&config).await,
            Err(e) => Err(e),
        },
        Command::Schema => Ok(ExitCode::SUCCESS),
    };

    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "Pipeline failed");
    }
    result
}

fn load_config(cli: &Cli) -> anyhow::Result<PipelineConfig> {
    let env = |key: &str| std::env::var(key).ok();
    let mut config = PipelineConfig::from_env()?;
    if let Some(provider) = cli.command.storage() {
        config = config.with_provider(provider, &env)?;
    }
    if let Some(dir) = &cli.results_dir {
        config.results_dir = dir.clone();
    }
    if let Some(model_type) = &cli.model_type {
        config.metadata.model_type = model_type.clone();
    }
    if let Some(feature_count) = cli.feature_count {
        config.metadata.feature_count = feature_count;
    }
    if let Some(policy) = &cli.policy {
        config.policy_path = Some(policy.clone());
    }
    Ok(config)
}

async fn upload(config: &PipelineConfig) -> anyhow::Result<ExitCode> {
    let summary = upload_stage(config).await?;
    tracing::info!(
        "Upload finished: {}/{} files, {} failed",
        summary.successful_uploads,
        summary.total_files,
        summary.failed_uploads
    );
    Ok(if summary.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
