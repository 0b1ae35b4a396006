#[cfg(test)]
#[path = "query_client_test.rs"]
mod tests;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::models::bound_workspace;
use crate::domain::models::BackendBox;
use crate::domain::models::ClientError;
use crate::domain::models::Event;
use crate::domain::models::QueryRequest;
use crate::domain::models::QueryResult;
use crate::domain::models::WorkspaceStoreBox;

pub const DEFAULT_TOP_K: u32 = 10;

/// Sends workspace scoped questions and holds the latest answer.
///
/// Every `ask` is tagged with a sequence number and supersedes the one before
/// it. The superseded request is aborted, and should its response still arrive
/// it is dropped by `handle_resolved`, so the displayed result always belongs
/// to the most recent question.
pub struct QueryClient {
    backend: BackendBox,
    store: WorkspaceStoreBox,
    tx: mpsc::UnboundedSender<Event>,
    top_k: u32,
    latest: u64,
    worker: Option<JoinHandle<()>>,
    result: Option<QueryResult>,
    error: Option<String>,
}

impl QueryClient {
    pub fn new(
        backend: BackendBox,
        store: WorkspaceStoreBox,
        tx: mpsc::UnboundedSender<Event>,
        top_k: u32,
    ) -> QueryClient {
        return QueryClient {
            backend,
            store,
            tx,
            top_k,
            latest: 0,
            worker: None,
            result: None,
            error: None,
        };
    }

    pub fn result(&self) -> Option<&QueryResult> {
        return self.result.as_ref();
    }

    pub fn error(&self) -> Option<&str> {
        return self.error.as_deref();
    }

    /// Sends `question` to the bound workspace. Blank questions are ignored and
    /// return `Ok(None)`, otherwise the request's sequence number is returned.
    pub async fn ask(&mut self, question: &str) -> Result<Option<u64>, ClientError> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(None);
        }

        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
        self.latest += 1;
        let seq = self.latest;

        let Some(workspace) = bound_workspace(&self.store).await else {
            let err = ClientError::MissingWorkspace;
            self.result = None;
            self.error = Some(err.to_string());
            return Err(err);
        };

        let request = QueryRequest {
            query: question.to_string(),
            top_k: self.top_k,
            namespace: workspace.to_string(),
        };

        tracing::debug!(seq = seq, namespace = request.namespace, "Sending query");

        let backend = self.backend.clone();
        let tx = self.tx.clone();
        self.worker = Some(tokio::spawn(async move {
            let res = backend.query(&request).await;
            if tx.send(Event::QueryResolved(seq, res)).is_err() {
                tracing::warn!(seq = seq, "Query response dropped, receiver closed");
            }
        }));

        return Ok(Some(seq));
    }

    /// Applies a query response. Returns false when the response belongs to a
    /// superseded question and was discarded.
    pub fn handle_resolved(&mut self, seq: u64, res: Result<QueryResult, ClientError>) -> bool {
        if seq != self.latest {
            tracing::debug!(seq = seq, latest = self.latest, "Dropping stale query response");
            return false;
        }

        match res {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(error = ?err, "Query failed");
                self.result = None;
                self.error = Some(err.to_string());
            }
        }

        return true;
    }
}
