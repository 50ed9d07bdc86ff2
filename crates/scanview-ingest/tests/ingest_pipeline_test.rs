//! End-to-end ingestion tests against realistic scanner output.
//!
//! Fixtures live in `tests/fixtures` and are read through `LocalFile`, the
//! same path a desktop shell would use.

use std::path::PathBuf;

use scanview_ingest::{
    DatasetStore, Error, FileSource, LocalFile, ResourceType, StatusColor, UploadPanel,
};

fn fixture(name: &str) -> LocalFile {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name]
        .iter()
        .collect();
    LocalFile::new(path)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

async fn load(store: &mut DatasetStore, panel: &mut UploadPanel, name: &str) {
    let file = fixture(name);
    panel
        .submit(store, Some(&file))
        .await
        .unwrap_or_else(|e| panic!("Failed to load {name}: {e}"));
}

#[tokio::test]
async fn test_prod_fixture_normalizes_supported_categories_only() {
    init_tracing();
    let mut store = DatasetStore::new();
    let mut panel = UploadPanel::new();
    load(&mut store, &mut panel, "acme-prod.json").await;

    let resources = store.resources();
    assert_eq!(resources.len(), 8);
    assert!(resources.iter().all(|r| r.project_id == "acme-prod"));
    assert!(resources.iter().all(|r| r.source_file == "acme-prod.json"));
    assert!(!resources.iter().any(|r| r.name == "lb-ip"));
    assert!(!resources.iter().any(|r| r.name == "allow-health-checks"));

    let vm = &resources[0];
    assert_eq!(vm.resource_type, ResourceType::ComputeInstance);
    assert_eq!(vm.name, "web-frontend-1");
    assert_eq!(vm.status_color(), StatusColor::Green);
    assert_eq!(vm.attribute("zone").unwrap().to_text(), "us-central1-a");
    assert_eq!(vm.attribute("machineType").unwrap().to_text(), "e2-standard-4");
    assert!(vm.attribute("deletionProtection").is_none());
    assert!(vm.created_at().is_some());

    let disk = resources
        .iter()
        .find(|r| r.resource_type == ResourceType::ComputeDisk)
        .unwrap();
    assert!(disk.attribute("type").is_none());
    assert_eq!(disk.attribute("sizeGb").unwrap().to_text(), "100");

    let function = resources
        .iter()
        .find(|r| r.resource_type == ResourceType::CloudFunction)
        .unwrap();
    assert_eq!(function.name, "resize-images");
    assert_eq!(function.status, "ACTIVE");
    assert_eq!(function.status_color(), StatusColor::Grey);

    let sql = resources
        .iter()
        .find(|r| r.resource_type == ResourceType::SqlInstance)
        .unwrap();
    assert_eq!(sql.status, "READY");
    assert_eq!(sql.attribute("state").unwrap().to_text(), "RUNNABLE");
}

#[tokio::test]
async fn test_prod_fixture_roles() {
    let mut store = DatasetStore::new();
    let mut panel = UploadPanel::new();
    load(&mut store, &mut panel, "acme-prod.json").await;

    let keys: Vec<&str> = store.roles().iter().map(|r| r.role.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "acme-prod__owner",
            "acme-prod__compute.viewer",
            "acme-prod__deployer"
        ]
    );

    let viewer = &store.roles()[1];
    assert_eq!(viewer.members.len(), 2);
    assert_eq!(viewer.members[0].member_type, "serviceAccount");
    assert_eq!(
        viewer.members[0].identifier,
        "monitoring@acme-prod.iam.gserviceaccount.com"
    );
}

#[tokio::test]
async fn test_multi_file_removal_is_exact() {
    let mut store = DatasetStore::new();
    let mut panel = UploadPanel::new();
    load(&mut store, &mut panel, "acme-prod.json").await;
    let after_prod = store.clone();

    load(&mut store, &mut panel, "acme-staging.json").await;
    load(&mut store, &mut panel, "acme-prod-extra.json").await;
    assert_eq!(store.project_ids(), ["acme-prod", "acme-staging"]);
    assert_eq!(store.resources().len(), 8 + 4 + 1);
    assert_eq!(store.roles().len(), 3 + 1);

    let unknown = store
        .resources()
        .iter()
        .find(|r| r.id.as_deref() == Some("88"))
        .unwrap();
    assert_eq!(unknown.name, "unknown");
    assert_eq!(unknown.status, "READY");

    let removed = panel.remove(&mut store, "acme-prod-extra.json").unwrap();
    assert_eq!(removed.resource_count, 1);
    assert!(removed.removed_project_ids.is_empty());
    assert!(store.project_ids().contains(&"acme-prod".to_string()));

    let removed = panel.remove(&mut store, "acme-staging.json").unwrap();
    assert_eq!(removed.removed_project_ids, vec!["acme-staging".to_string()]);
    assert_eq!(store, after_prod);
}

#[tokio::test]
async fn test_duplicate_upload_is_rejected_before_reading() {
    let mut store = DatasetStore::new();
    let mut panel = UploadPanel::new();
    load(&mut store, &mut panel, "acme-prod.json").await;
    let before = store.clone();

    let again = fixture("acme-prod.json");
    let err = panel.submit(&mut store, Some(&again)).await.unwrap_err();
    assert_eq!(err, Error::DuplicateFile("acme-prod.json".to_string()));
    assert_eq!(panel.error_message(), Some("File already uploaded"));
    assert_eq!(store, before);
}

#[tokio::test]
async fn test_legacy_projects_map_is_invalid_file() {
    let mut store = DatasetStore::new();
    let mut panel = UploadPanel::new();

    let legacy = fixture("legacy-projects-map.json");
    let err = panel.submit(&mut store, Some(&legacy)).await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(panel.error_message(), Some("Invalid file"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_missing_file_is_read_error() {
    let mut store = DatasetStore::new();
    let mut panel = UploadPanel::new();

    let missing = fixture("does-not-exist.json");
    assert_eq!(missing.name(), "does-not-exist.json");
    let err = panel.submit(&mut store, Some(&missing)).await.unwrap_err();
    assert!(matches!(err, Error::Read(_)));
    assert_eq!(panel.error_message(), Some("Could not read file"));
}

#[tokio::test]
async fn test_size_limit_rejects_large_file() {
    let mut store = DatasetStore::new().with_max_file_bytes(64);
    let mut panel = UploadPanel::new();

    let file = fixture("acme-prod.json");
    let err = panel.submit(&mut store, Some(&file)).await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert!(store.is_empty());
}
