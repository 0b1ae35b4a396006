use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::models::Backend;
use crate::domain::models::ClientError;
use crate::domain::models::FileResult;
use crate::domain::models::FileResultStatus;
use crate::domain::models::QueryRequest;
use crate::domain::models::QueryResult;
use crate::domain::models::SelectedFile;
use crate::domain::models::UploadResponse;
use crate::domain::models::WorkspaceId;

/// In-process backend that records every request and tracks how many uploads
/// overlap.
#[derive(Default)]
pub struct FakeBackend {
    pub uploads: Mutex<Vec<(String, String)>>,
    pub queries: Mutex<Vec<QueryRequest>>,
    pub max_in_flight: AtomicUsize,
    in_flight: AtomicUsize,
    upload_errors: HashMap<String, ClientError>,
    item_errors: HashMap<String, String>,
    query_response: Option<Result<QueryResult, ClientError>>,
}

impl FakeBackend {
    pub fn with_upload_error(mut self, filename: &str, err: ClientError) -> FakeBackend {
        self.upload_errors.insert(filename.to_string(), err);
        return self;
    }

    pub fn with_item_error(mut self, filename: &str, message: &str) -> FakeBackend {
        self.item_errors
            .insert(filename.to_string(), message.to_string());
        return self;
    }

    pub fn with_query_response(mut self, res: Result<QueryResult, ClientError>) -> FakeBackend {
        self.query_response = Some(res);
        return self;
    }

    pub fn uploaded_files(&self) -> Vec<String> {
        return self
            .uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(filename, _)| return filename.to_string())
            .collect();
    }

    pub fn query_count(&self) -> usize {
        return self.queries.lock().unwrap().len();
    }
}

#[async_trait]
impl Backend for FakeBackend {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<(), ClientError> {
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn upload(
        &self,
        file: &SelectedFile,
        workspace: &WorkspaceId,
    ) -> Result<UploadResponse, ClientError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        self.uploads
            .lock()
            .unwrap()
            .push((file.name.to_string(), workspace.to_string()));

        tokio::time::sleep(Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(err) = self.upload_errors.get(&file.name) {
            return Err(err.clone());
        }

        let result = match self.item_errors.get(&file.name) {
            Some(message) => FileResult {
                filename: Some(file.name.to_string()),
                status: FileResultStatus::Error,
                chunks_created: None,
                message: Some(message.to_string()),
            },
            None => FileResult {
                filename: Some(file.name.to_string()),
                status: FileResultStatus::Success,
                chunks_created: Some(file.bytes.len() as u64),
                message: None,
            },
        };

        return Ok(UploadResponse {
            message: format!("Processed 1 file(s) in workspace '{workspace}'"),
            total_chunks: result.chunks_created.unwrap_or(0),
            results: vec![result],
        });
    }

    #[allow(clippy::implicit_return)]
    async fn query(&self, request: &QueryRequest) -> Result<QueryResult, ClientError> {
        self.queries.lock().unwrap().push(request.clone());

        if let Some(res) = &self.query_response {
            return res.clone();
        }

        return Ok(QueryResult {
            answer: format!("No answer for {}", request.query),
            sources: vec![],
        });
    }
}
