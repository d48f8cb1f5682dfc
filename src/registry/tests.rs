use super::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

async fn open_registry() -> (TempDir, ActivationRegistry) {
    let dir = tempfile::tempdir().unwrap();
    let registry = ActivationRegistry::open(dir.path().join("data").join(REGISTRY_FILE_NAME))
        .await
        .unwrap();
    (dir, registry)
}

#[tokio::test]
async fn creates_empty_registry_file() {
    let (_dir, registry) = open_registry().await;
    assert_eq!(std::fs::read_to_string(registry.path()).unwrap(), "[]");
    assert!(registry.list().await.is_empty());
}

#[tokio::test]
async fn keeps_existing_file_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(REGISTRY_FILE_NAME);
    std::fs::write(&path, r#"["Quiz1","Quiz2"]"#).unwrap();
    let registry = ActivationRegistry::open(&path).await.unwrap();
    assert_eq!(registry.list().await, vec!["Quiz1", "Quiz2"]);
}

#[tokio::test]
async fn activated_quiz_is_active() {
    let (_dir, registry) = open_registry().await;
    assert!(!registry.is_active("Quiz1").await);
    assert_eq!(registry.activate("Quiz1").await.unwrap(), vec!["Quiz1"]);
    assert!(registry.is_active("Quiz1").await);
}

#[tokio::test]
async fn activation_is_idempotent() {
    let (_dir, registry) = open_registry().await;
    registry.activate("Quiz1").await.unwrap();
    assert_eq!(registry.activate("Quiz1").await.unwrap(), vec!["Quiz1"]);
    assert_eq!(registry.list().await, vec!["Quiz1"]);
}

#[tokio::test]
async fn deactivated_quiz_is_inactive() {
    let (_dir, registry) = open_registry().await;
    registry.activate("Quiz1").await.unwrap();
    registry.activate("Quiz2").await.unwrap();
    assert_eq!(registry.deactivate("Quiz1").await.unwrap(), vec!["Quiz2"]);
    assert!(!registry.is_active("Quiz1").await);
    assert_eq!(registry.deactivate("Quiz1").await.unwrap(), vec!["Quiz2"]);
}

#[tokio::test]
async fn names_are_case_sensitive() {
    let (_dir, registry) = open_registry().await;
    registry.activate("Quiz1").await.unwrap();
    assert!(!registry.is_active("quiz1").await);
}

#[tokio::test]
async fn mutations_are_persisted() {
    let (_dir, registry) = open_registry().await;
    registry.activate("Quiz1").await.unwrap();
    registry.activate("Quiz 2").await.unwrap();
    let reopened = ActivationRegistry::open(registry.path()).await.unwrap();
    assert_eq!(reopened.list().await, vec!["Quiz1", "Quiz 2"]);
    assert_eq!(
        std::fs::read_to_string(registry.path()).unwrap(),
        r#"["Quiz1","Quiz 2"]"#
    );
}

#[tokio::test]
async fn corrupt_file_reads_as_empty() {
    let (_dir, registry) = open_registry().await;
    std::fs::write(registry.path(), "{not json").unwrap();
    assert!(registry.list().await.is_empty());
    assert!(!registry.is_active("Quiz1").await);
    assert_eq!(registry.activate("Quiz1").await.unwrap(), vec!["Quiz1"]);
}

#[tokio::test]
async fn duplicate_entries_are_listed_once() {
    let (_dir, registry) = open_registry().await;
    std::fs::write(registry.path(), r#"["Quiz1","Quiz1","Quiz2"]"#).unwrap();
    assert_eq!(registry.list().await, vec!["Quiz1", "Quiz2"]);
}
