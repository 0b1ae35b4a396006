#[cfg(test)]
#[path = "upload_orchestrator_test.rs"]
mod tests;

use tokio::sync::mpsc;

use crate::domain::models::bound_workspace;
use crate::domain::models::BatchSummary;
use crate::domain::models::ClientError;
use crate::domain::models::FileHandle;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::UploadItem;
use crate::domain::models::UploadJob;
use crate::domain::models::UploadOutcome;
use crate::domain::models::UploadStatus;
use crate::domain::models::WorkspaceStoreBox;

/// Owns the visible upload list and the latest batch message. Uploads
/// themselves are carried out by the `UploadWorker` on the other end of `jobs`.
pub struct UploadOrchestrator {
    items: Vec<UploadItem>,
    message: Option<Message>,
    store: WorkspaceStoreBox,
    jobs: mpsc::UnboundedSender<UploadJob>,
}

impl UploadOrchestrator {
    pub fn new(store: WorkspaceStoreBox, jobs: mpsc::UnboundedSender<UploadJob>) -> Self {
        return UploadOrchestrator {
            items: vec![],
            message: None,
            store,
            jobs,
        };
    }

    pub fn items(&self) -> &[UploadItem] {
        return &self.items;
    }

    pub fn message(&self) -> Option<&Message> {
        return self.message.as_ref();
    }

    pub fn has_pending(&self) -> bool {
        return self
            .items
            .iter()
            .any(|e| return e.status == UploadStatus::Pending);
    }

    /// Queues a selection of files for upload into the bound workspace. Items
    /// show up as pending before any request is made.
    pub async fn submit_batch(&mut self, files: Vec<FileHandle>) -> Result<(), ClientError> {
        if files.is_empty() {
            return Ok(());
        }

        let Some(workspace) = bound_workspace(&self.store).await else {
            let err = ClientError::MissingWorkspace;
            self.message = Some(Message::new_with_type(
                MessageType::Error,
                &err.to_string(),
            ));
            return Err(err);
        };

        for file in files.iter() {
            self.items.push(UploadItem::pending(file.clone()));
        }

        tracing::debug!(
            files = files.len(),
            workspace = workspace.as_str(),
            "Queued upload batch"
        );

        let job = UploadJob {
            workspace,
            files: files.clone(),
        };
        if self.jobs.send(job).is_err() {
            let err = ClientError::TransportFailure("The upload worker is not running".to_string());
            for file in files.iter() {
                self.handle_resolved(
                    file,
                    UploadOutcome::Failed {
                        message: err.to_string(),
                    },
                );
            }
            self.message = Some(Message::new_with_type(
                MessageType::Error,
                &err.to_string(),
            ));
            return Err(err);
        }

        return Ok(());
    }

    /// Applies a finished upload to the first pending item created from `file`.
    /// Returns the item's index, or `None` when no pending item matches.
    pub fn handle_resolved(&mut self, file: &FileHandle, outcome: UploadOutcome) -> Option<usize> {
        let idx = self
            .items
            .iter()
            .position(|e| return e.is(file) && e.status == UploadStatus::Pending)?;

        self.items[idx].resolve(outcome);
        return Some(idx);
    }

    pub fn handle_finished(&mut self, summary: &BatchSummary) -> &Message {
        return self.message.insert(summary.to_message());
    }

    /// Removes a finished item. Pending items stay put since their request is
    /// still outstanding.
    pub fn remove_item(&mut self, file: &FileHandle) -> bool {
        let idx = self
            .items
            .iter()
            .position(|e| return e.is(file) && e.status != UploadStatus::Pending);

        if let Some(idx) = idx {
            self.items.remove(idx);
            return true;
        }

        return false;
    }

    pub fn remove_at(&mut self, idx: usize) -> bool {
        if idx >= self.items.len() || self.items[idx].status == UploadStatus::Pending {
            return false;
        }

        self.items.remove(idx);
        return true;
    }
}
