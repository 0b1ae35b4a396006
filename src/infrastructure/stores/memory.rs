use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::models::WorkspaceId;
use crate::domain::models::WorkspaceStore;

/// Non-persistent store for exercising services without a state file.
#[derive(Default)]
pub struct MemoryWorkspaceStore {
    value: Mutex<Option<WorkspaceId>>,
}

#[async_trait]
impl WorkspaceStore for MemoryWorkspaceStore {
    #[allow(clippy::implicit_return)]
    async fn get(&self) -> Result<Option<WorkspaceId>> {
        return Ok(self.value.lock().await.clone());
    }

    #[allow(clippy::implicit_return)]
    async fn set(&self, raw: &str) -> Result<WorkspaceId> {
        let workspace = WorkspaceId::sanitize(raw);
        *self.value.lock().await = Some(workspace.clone());
        return Ok(workspace);
    }

    #[allow(clippy::implicit_return)]
    async fn clear(&self) -> Result<()> {
        *self.value.lock().await = None;
        return Ok(());
    }
}
