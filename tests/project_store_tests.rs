mod common;

use common::record;
use gitpilot::capabilities::ProjectStore;
use gitpilot::config::{ConfigProvider, Settings};
use gitpilot::services::JsonProjectStore;
use gitpilot::CapabilityError;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

/// Settings whose `projectsFile` can be changed between calls.
struct SwitchableConfig(Mutex<PathBuf>);

impl ConfigProvider for SwitchableConfig {
    fn settings(&self) -> Settings {
        Settings {
            projects_file: Some(self.0.lock().unwrap().clone()),
            ..Settings::default()
        }
    }
}

#[tokio::test]
async fn test_missing_file_is_an_empty_list() {
    let dir = tempdir().unwrap();
    let store = JsonProjectStore::new(dir.path().join("nested").join("projects.json"));

    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upsert_appends_then_replaces() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("projects.json");
    let store = JsonProjectStore::new(path.clone());

    store.upsert(record("a/one", "/tmp/a/one")).await.unwrap();
    store.upsert(record("b/two", "/tmp/b/two")).await.unwrap();
    assert_eq!(store.list_all().await.unwrap().len(), 2);

    // Same repository id, new location.
    store.upsert(record("a/one", "/elsewhere/a/one")).await.unwrap();
    let projects = store.list_all().await.unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].full_name, "a/one");
    assert_eq!(projects[0].local_path.to_str(), Some("/elsewhere/a/one"));

    // Pretty-printed camelCase JSON array.
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("[\n"));
    assert!(text.contains("\"fullName\": \"b/two\""));
    assert!(text.contains("\"downloadedAt\""));

    // A second store over the same file sees the same data.
    let reopened = JsonProjectStore::new(path);
    assert_eq!(reopened.list_all().await.unwrap(), projects);
}

#[tokio::test]
async fn test_corrupt_file_reads_as_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("projects.json");
    std::fs::write(&path, "{ not a list").unwrap();
    let store = JsonProjectStore::new(path);

    assert!(store.list_all().await.unwrap().is_empty());
    assert!(store.valid_projects().await.is_empty());
}

#[tokio::test]
async fn test_corrupt_file_is_never_overwritten() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("projects.json");
    let truncated = r#"[{"id":"1","name":"x", TRUNCATED"#;
    std::fs::write(&path, truncated).unwrap();
    let store = JsonProjectStore::new(path.clone());

    let err = store.upsert(record("a/one", "/tmp/a/one")).await.unwrap_err();
    assert!(matches!(err, CapabilityError::Parse(_)), "{:?}", err);
    let err = store.delete("1").await.unwrap_err();
    assert!(matches!(err, CapabilityError::Parse(_)), "{:?}", err);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), truncated);
}

#[tokio::test]
async fn test_unreadable_file_is_io_error() {
    let dir = tempdir().unwrap();
    // A directory where the file should be cannot be read as text.
    let path = dir.path().join("projects.json");
    std::fs::create_dir_all(&path).unwrap();
    let store = JsonProjectStore::new(path.clone());

    let err = store.upsert(record("a/one", "/tmp/a/one")).await.unwrap_err();
    assert!(matches!(err, CapabilityError::Io(_)), "{:?}", err);
    assert!(path.is_dir());
}

#[tokio::test]
async fn test_configured_location_is_read_per_call() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    let config = Arc::new(SwitchableConfig(Mutex::new(first.clone())));
    let store = JsonProjectStore::from_config(config.clone());

    store.upsert(record("a/one", "/tmp/a/one")).await.unwrap();
    assert_eq!(store.path(), first);

    *config.0.lock().unwrap() = second.clone();
    store.upsert(record("b/two", "/tmp/b/two")).await.unwrap();

    assert_eq!(store.path(), second);
    let in_second = store.list_all().await.unwrap();
    assert_eq!(in_second.len(), 1);
    assert_eq!(in_second[0].full_name, "b/two");
    assert_eq!(JsonProjectStore::new(first).list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_removes_checkout_and_entry() {
    let dir = tempdir().unwrap();
    let checkout = dir.path().join("checkouts").join("a").join("one");
    std::fs::create_dir_all(checkout.join("src")).unwrap();
    std::fs::write(checkout.join("src").join("main.rs"), "fn main() {}").unwrap();

    let store = JsonProjectStore::new(dir.path().join("projects.json"));
    let project = record("a/one", checkout.to_str().unwrap());
    let id = project.id.clone();
    store.upsert(project).await.unwrap();
    store.upsert(record("b/two", "/tmp/b/two")).await.unwrap();

    store.delete(&id).await.unwrap();

    assert!(!checkout.exists());
    let remaining = store.list_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].full_name, "b/two");
}

#[tokio::test]
async fn test_delete_unknown_id() {
    let dir = tempdir().unwrap();
    let store = JsonProjectStore::new(dir.path().join("projects.json"));

    let err = store.delete("404").await.unwrap_err();
    assert!(matches!(err, CapabilityError::NotFound(_)));
}

#[tokio::test]
async fn test_valid_projects_skips_missing_checkouts() {
    let dir = tempdir().unwrap();
    let present = dir.path().join("present");
    std::fs::create_dir_all(&present).unwrap();

    let store = JsonProjectStore::new(dir.path().join("projects.json"));
    store.upsert(record("a/present", present.to_str().unwrap())).await.unwrap();
    store
        .upsert(record("a/gone", dir.path().join("gone").to_str().unwrap()))
        .await
        .unwrap();

    let valid = store.valid_projects().await;
    assert_eq!(valid.len(), 1);
    assert_eq!(valid[0].full_name, "a/present");
    assert_eq!(store.list_all().await.unwrap().len(), 2);
}
