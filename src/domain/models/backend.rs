use std::sync::Arc;

use async_trait::async_trait;

use super::ClientError;
use super::QueryRequest;
use super::QueryResult;
use super::SelectedFile;
use super::UploadResponse;
use super::WorkspaceId;

#[async_trait]
pub trait Backend {
    /// Used at shell startup and by `dossier health` to verify the API is
    /// reachable before any documents are sent.
    async fn health_check(&self) -> Result<(), ClientError>;

    /// Uploads a single file into the workspace. Per-file rejections come back
    /// inside the response rather than as an error.
    async fn upload(
        &self,
        file: &SelectedFile,
        workspace: &WorkspaceId,
    ) -> Result<UploadResponse, ClientError>;

    /// Asks a question against the documents of the request's namespace.
    async fn query(&self, request: &QueryRequest) -> Result<QueryResult, ClientError>;
}

pub type BackendBox = Arc<dyn Backend + Send + Sync>;
