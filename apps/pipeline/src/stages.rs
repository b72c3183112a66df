//! Evaluation and upload stages
//!
//! Each stage takes the run configuration by reference and leaves its results
//! in the results directory, so they can run in one process or separately.

use crate::config::PipelineConfig;
use anyhow::Context;
use diagnosis_evaluation::{
    EvaluationDocument, PredictionFile, PredictionSet, ReportGenerator, compute_metrics, roc_curve,
};
use diagnosis_storage::{ArtifactSet, SUMMARY_FILE, UploadSummary};
use std::path::{Path, PathBuf};

pub const ROC_CURVE_FILE: &str = "roc_curve.json";

#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub document: EvaluationDocument,
    pub metrics_path: PathBuf,
    pub report_path: PathBuf,
    /// Absent when the test set holds a single class.
    pub roc_curve_path: Option<PathBuf>,
}

pub fn evaluate_stage(config: &PipelineConfig, predictions: &Path) -> anyhow::Result<EvaluationOutcome> {
    tracing::info!(predictions = %predictions.display(), "Starting evaluation stage");

    let file = PredictionFile::read(predictions)
        .with_context(|| format!("evaluation: reading {}", predictions.display()))?;
    let set = PredictionSet::try_from(file)
        .with_context(|| format!("evaluation: validating {}", predictions.display()))?;

    let document = EvaluationDocument::new(&config.metadata, compute_metrics(&set));
    let generator = ReportGenerator::new(config.load_policy().context("evaluation")?);
    let rendered = generator.render(&document).context("evaluation: rendering report")?;
    let (metrics_path, report_path) = rendered
        .write_to(&config.results_dir)
        .context("evaluation: writing report")?;

    let roc_curve_path = match roc_curve(&set) {
        Some(curve) => {
            let path = config.results_dir.join(ROC_CURVE_FILE);
            let json = serde_json::to_string_pretty(&curve).context("evaluation: encoding ROC curve")?;
            std::fs::write(&path, json)
                .with_context(|| format!("evaluation: writing {}", path.display()))?;
            Some(path)
        }
        None => {
            // a curve left by an earlier run must not be uploaded with this one
            let stale = config.results_dir.join(ROC_CURVE_FILE);
            match std::fs::remove_file(&stale) {
                Ok(()) => tracing::debug!(path = %stale.display(), "Removed stale ROC curve"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("evaluation: removing {}", stale.display()));
                }
            }
            None
        }
    };

    tracing::info!(
        samples = document.test_set_size,
        accuracy = %format!("{:.4}", document.metrics.accuracy),
        "Evaluation stage finished"
    );
    Ok(EvaluationOutcome {
        document,
        metrics_path,
        report_path,
        roc_curve_path,
    })
}

/// Uploads every file in the results directory, then writes the upload
/// summary and uploads it last.
pub async fn upload_stage(config: &PipelineConfig) -> anyhow::Result<UploadSummary> {
    let results_dir = &config.results_dir;
    tracing::info!(
        results = %results_dir.display(),
        storage = %config.storage.provider(),
        "Starting upload stage"
    );

    let artifacts = ArtifactSet::from_dir(results_dir)
        .with_context(|| format!("upload: collecting {}", results_dir.display()))?;
    let backend = config.storage.build_backend().context("upload")?;
    let summary = backend.upload(&artifacts).await.context("upload")?;

    for failure in summary.failures() {
        tracing::warn!(
            artifact = %failure.name,
            error = failure.error.as_deref().unwrap_or("unknown"),
            "Artifact was not uploaded"
        );
    }

    let summary_path = results_dir.join(SUMMARY_FILE);
    summary
        .write(&summary_path)
        .with_context(|| format!("upload: writing {}", summary_path.display()))?;

    let trailer = ArtifactSet::new().with(SUMMARY_FILE, &summary_path)?;
    match backend.upload(&trailer).await {
        Ok(result) if result.all_succeeded() => {}
        Ok(_) => tracing::warn!("Upload summary could not be uploaded"),
        Err(e) => tracing::warn!(error = %e, "Upload summary could not be uploaded"),
    }

    Ok(summary)
}
