#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::WorkspaceId;
use crate::domain::models::WorkspaceStore;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredState {
    #[serde(
        rename = "contractNamespace",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    contract_namespace: Option<String>,
}

/// Keeps the workspace binding in a small YAML state file so it survives
/// restarts.
pub struct FileWorkspaceStore {
    pub file_path: path::PathBuf,
}

impl Default for FileWorkspaceStore {
    fn default() -> FileWorkspaceStore {
        return FileWorkspaceStore::new(path::PathBuf::from(Config::get(
            ConfigKey::StateFile,
        )));
    }
}

impl FileWorkspaceStore {
    pub fn new(file_path: path::PathBuf) -> FileWorkspaceStore {
        return FileWorkspaceStore { file_path };
    }

    async fn read_state(&self) -> Result<StoredState> {
        if !self.file_path.exists() {
            return Ok(StoredState::default());
        }

        let payload = fs::read_to_string(&self.file_path).await?;
        if payload.trim().is_empty() {
            return Ok(StoredState::default());
        }

        let state: StoredState = serde_yaml::from_str(&payload)?;
        return Ok(state);
    }

    /// Unreadable state is replaced on the next write.
    async fn read_state_or_default(&self) -> StoredState {
        match self.read_state().await {
            Ok(state) => return state,
            Err(err) => {
                tracing::warn!(error = ?err, path = ?self.file_path, "Discarding unreadable state file");
                return StoredState::default();
            }
        }
    }

    async fn write_state(&self, state: &StoredState) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let payload = serde_yaml::to_string(state)?;
        let mut file = fs::File::create(&self.file_path).await?;
        file.write_all(payload.as_bytes()).await?;
        file.sync_all().await?;

        return Ok(());
    }
}

#[async_trait]
impl WorkspaceStore for FileWorkspaceStore {
    #[allow(clippy::implicit_return)]
    async fn get(&self) -> Result<Option<WorkspaceId>> {
        let state = self.read_state().await?;
        return Ok(state
            .contract_namespace
            .map(|e| return WorkspaceId::sanitize(&e)));
    }

    #[allow(clippy::implicit_return)]
    async fn set(&self, raw: &str) -> Result<WorkspaceId> {
        let workspace = WorkspaceId::sanitize(raw);
        let mut state = self.read_state_or_default().await;
        state.contract_namespace = Some(workspace.to_string());
        self.write_state(&state).await?;

        tracing::debug!(
            workspace = workspace.as_str(),
            path = ?self.file_path,
            "Saved workspace binding"
        );

        return Ok(workspace);
    }

    #[allow(clippy::implicit_return)]
    async fn clear(&self) -> Result<()> {
        if !self.file_path.exists() {
            return Ok(());
        }

        let mut state = self.read_state_or_default().await;
        state.contract_namespace = None;
        self.write_state(&state).await?;

        tracing::debug!(path = ?self.file_path, "Cleared workspace binding");

        return Ok(());
    }
}
