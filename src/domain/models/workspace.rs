#[cfg(test)]
#[path = "workspace_test.rs"]
mod tests;

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

/// Identifier of the workspace every upload and query is scoped to. Only
/// `[A-Za-z0-9_-]` survives construction, and an empty value means no
/// workspace is bound.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    pub fn sanitize(raw: &str) -> WorkspaceId {
        let cleaned = raw
            .chars()
            .filter(|c| return c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect::<String>();

        return WorkspaceId(cleaned);
    }

    pub fn as_str(&self) -> &str {
        return &self.0;
    }

    pub fn is_bound(&self) -> bool {
        return !self.0.is_empty();
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}

#[async_trait]
pub trait WorkspaceStore {
    /// Returns the persisted workspace, or `None` when it was never set or has
    /// been cleared.
    async fn get(&self) -> Result<Option<WorkspaceId>>;

    /// Sanitizes and persists the workspace, even when sanitizing leaves it
    /// empty. The write is durable once this returns.
    async fn set(&self, raw: &str) -> Result<WorkspaceId>;

    /// Removes the persisted workspace entirely.
    async fn clear(&self) -> Result<()>;
}

pub type WorkspaceStoreBox = Arc<dyn WorkspaceStore + Send + Sync>;

/// Reads the store and only returns a workspace that can gate a network call.
/// Read failures count as unbound.
pub async fn bound_workspace(store: &WorkspaceStoreBox) -> Option<WorkspaceId> {
    match store.get().await {
        Ok(Some(workspace)) if workspace.is_bound() => return Some(workspace),
        Ok(_) => return None,
        Err(err) => {
            tracing::warn!(error = ?err, "Failed to read workspace binding");
            return None;
        }
    }
}
