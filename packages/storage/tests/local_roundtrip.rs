use diagnosis_storage::{ArtifactSet, StorageBackend, StorageProvider, StorageTarget};

fn write_artifacts(dir: &std::path::Path) -> ArtifactSet {
    std::fs::create_dir_all(dir.join("plots")).unwrap();
    std::fs::write(dir.join("model.bin"), [0u8, 159, 146, 150, 255]).unwrap();
    std::fs::write(dir.join("model_metrics.json"), br#"{"accuracy": 0.9619}"#).unwrap();
    std::fs::write(dir.join("plots/roc_curve.json"), b"{}").unwrap();
    ArtifactSet::from_dir(dir).unwrap()
}

#[tokio::test]
async fn test_local_upload_is_byte_identical() {
    let results = tempfile::tempdir().unwrap();
    let uploads = tempfile::tempdir().unwrap();
    let artifacts = write_artifacts(results.path());

    let target = StorageTarget::from_vars(&|key: &str| match key {
        "STORAGE_TYPE" => Some("local".to_string()),
        "LOCAL_STORAGE_PATH" => Some(uploads.path().display().to_string()),
        _ => None,
    })
    .unwrap();
    let backend = target.build_backend().unwrap();
    assert_eq!(backend.provider(), StorageProvider::Local);

    let summary = backend.upload(&artifacts).await.unwrap();
    assert_eq!(summary.total_files, 3);
    assert!(summary.all_succeeded());

    for artifact in &artifacts {
        let copied = std::fs::read(uploads.path().join(&artifact.name)).unwrap();
        let original = std::fs::read(&artifact.path).unwrap();
        assert_eq!(copied, original, "{} differs", artifact.name);
    }

    assert_eq!(
        backend.list("").await.unwrap(),
        vec!["model.bin", "model_metrics.json", "plots/roc_curve.json"]
    );
}

#[tokio::test]
async fn test_local_upload_onto_itself_keeps_contents() {
    let results = tempfile::tempdir().unwrap();
    let artifacts = write_artifacts(results.path());

    let backend = StorageBackend::Local(
        diagnosis_storage::LocalBackend::new(results.path().to_path_buf()).unwrap(),
    );
    let summary = backend.upload(&artifacts).await.unwrap();

    assert!(summary.all_succeeded());
    assert_eq!(
        std::fs::read(results.path().join("model.bin")).unwrap(),
        vec![0u8, 159, 146, 150, 255]
    );
}

#[tokio::test]
async fn test_reupload_overwrites() {
    let results = tempfile::tempdir().unwrap();
    let uploads = tempfile::tempdir().unwrap();
    let artifacts = write_artifacts(results.path());
    let backend =
        StorageBackend::Local(diagnosis_storage::LocalBackend::new(uploads.path().to_path_buf()).unwrap());

    backend.upload(&artifacts).await.unwrap();
    std::fs::write(results.path().join("model_metrics.json"), b"{}").unwrap();
    backend.upload(&artifacts).await.unwrap();

    assert_eq!(std::fs::read(uploads.path().join("model_metrics.json")).unwrap(), b"{}");
}
