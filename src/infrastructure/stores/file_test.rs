use anyhow::Result;
use tokio::fs;

use super::FileWorkspaceStore;
use crate::domain::models::WorkspaceId;
use crate::domain::models::WorkspaceStore;

#[tokio::test]
async fn it_reads_none_without_a_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = FileWorkspaceStore::new(dir.path().join("state.yaml"));

    assert_eq!(store.get().await?, None);
    return Ok(());
}

#[tokio::test]
async fn it_persists_across_instances() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file_path = dir.path().join("nested/dir/state.yaml");

    let saved = FileWorkspaceStore::new(file_path.clone())
        .set("acme corp/2024")
        .await?;
    assert_eq!(saved.as_str(), "acmecorp2024");

    let reloaded = FileWorkspaceStore::new(file_path.clone()).get().await?;
    assert_eq!(reloaded, Some(WorkspaceId::sanitize("acmecorp2024")));

    let payload = fs::read_to_string(&file_path).await?;
    insta::assert_snapshot!(payload.trim(), @"contractNamespace: acmecorp2024");

    return Ok(());
}

#[tokio::test]
async fn it_persists_empty_values() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = FileWorkspaceStore::new(dir.path().join("state.yaml"));

    let saved = store.set("!!!").await?;
    assert!(!saved.is_bound());
    assert_eq!(store.get().await?, Some(WorkspaceId::default()));

    return Ok(());
}

#[tokio::test]
async fn it_clears_the_key() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file_path = dir.path().join("state.yaml");
    let store = FileWorkspaceStore::new(file_path.clone());

    store.set("acme").await?;
    store.clear().await?;

    assert_eq!(store.get().await?, None);
    assert_eq!(
        FileWorkspaceStore::new(file_path).get().await?,
        None
    );

    return Ok(());
}

#[tokio::test]
async fn it_clears_without_a_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file_path = dir.path().join("state.yaml");
    let store = FileWorkspaceStore::new(file_path.clone());

    store.clear().await?;
    assert!(!file_path.exists());

    return Ok(());
}

#[tokio::test]
async fn it_sanitizes_hand_edited_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file_path = dir.path().join("state.yaml");
    fs::write(&file_path, "contractNamespace: \"acme; rm\"\n").await?;

    let store = FileWorkspaceStore::new(file_path);
    assert_eq!(store.get().await?, Some(WorkspaceId::sanitize("acmerm")));

    return Ok(());
}

#[tokio::test]
async fn it_replaces_unreadable_state_on_write() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file_path = dir.path().join("state.yaml");
    fs::write(&file_path, "contractNamespace: [unterminated").await?;

    let store = FileWorkspaceStore::new(file_path.clone());
    assert!(store.get().await.is_err());

    store.set("acme").await?;
    assert_eq!(store.get().await?, Some(WorkspaceId::sanitize("acme")));

    fs::write(&file_path, "contractNamespace: [unterminated").await?;
    store.clear().await?;
    assert_eq!(store.get().await?, None);

    return Ok(());
}
