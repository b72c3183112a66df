use diagnosis_storage::object_store::{ObjectStore, memory::InMemory, path::Path};
use diagnosis_storage::{ArtifactSet, ObjectStoreBackend, StorageBackend, StorageProvider, UploadSummary};
use std::sync::Arc;

#[tokio::test]
async fn test_missing_artifact_is_counted_and_others_still_upload() {
    let results = tempfile::tempdir().unwrap();
    std::fs::write(results.path().join("model_metrics.json"), b"{}").unwrap();
    std::fs::write(results.path().join("evaluation_report.txt"), b"report").unwrap();

    let artifacts = ArtifactSet::new()
        .with("model_metrics.json", results.path().join("model_metrics.json"))
        .unwrap()
        .with("model.bin", results.path().join("model.bin"))
        .unwrap()
        .with("evaluation_report.txt", results.path().join("evaluation_report.txt"))
        .unwrap();

    let store = Arc::new(InMemory::new());
    let backend = StorageBackend::S3(ObjectStoreBackend::new(
        store.clone(),
        "s3",
        "diagnosis-results",
        Some("runs/1"),
    ));

    let summary = backend.upload(&artifacts).await.unwrap();
    assert_eq!(summary.storage_type, StorageProvider::S3);
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.successful_uploads, 2);
    assert_eq!(summary.failed_uploads, 1);

    let names: Vec<&str> = summary.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["model_metrics.json", "model.bin", "evaluation_report.txt"]);
    assert_eq!(
        summary.files[2].remote_ref.as_deref(),
        Some("s3://diagnosis-results/runs/1/evaluation_report.txt")
    );

    let report = store
        .get(&Path::from("runs/1/evaluation_report.txt"))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    assert_eq!(report.as_ref(), b"report");

    assert_eq!(
        backend.list("").await.unwrap(),
        vec!["evaluation_report.txt", "model_metrics.json"]
    );
    assert_eq!(backend.list("model").await.unwrap(), vec!["model_metrics.json"]);

    let path = results.path().join("upload_summary.json");
    summary.write(&path).unwrap();
    assert_eq!(UploadSummary::read(&path).unwrap(), summary);
}
