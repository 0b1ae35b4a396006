#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;

use std::path;
use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;
use tokio::fs;

use super::Message;
use super::MessageType;
use super::WorkspaceId;

/// A file picked by the user, read into memory at selection time.
#[derive(Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Items are identified by the handle they were created from, so two selections
/// of the same content are still two items.
pub type FileHandle = Arc<SelectedFile>;

impl SelectedFile {
    pub fn new(name: &str, bytes: Vec<u8>) -> FileHandle {
        return Arc::new(SelectedFile {
            name: name.to_string(),
            bytes,
        });
    }

    pub async fn read(file_path: &path::Path) -> Result<FileHandle> {
        let bytes = fs::read(file_path).await?;
        let name = file_path
            .file_name()
            .map(|e| return e.to_string_lossy().to_string())
            .unwrap_or_else(|| return file_path.to_string_lossy().to_string());

        return Ok(SelectedFile::new(&name, bytes));
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Success,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    Success { chunks_created: u64 },
    Failed { message: String },
}

#[derive(Clone, Debug)]
pub struct UploadItem {
    pub file: FileHandle,
    pub status: UploadStatus,
    pub message: Option<String>,
    pub chunks_created: Option<u64>,
}

impl UploadItem {
    pub fn pending(file: FileHandle) -> UploadItem {
        return UploadItem {
            file,
            status: UploadStatus::Pending,
            message: None,
            chunks_created: None,
        };
    }

    pub fn is(&self, file: &FileHandle) -> bool {
        return Arc::ptr_eq(&self.file, file);
    }

    /// Moves a pending item to its final state. Returns false when the item was
    /// already resolved, in which case nothing changes.
    pub fn resolve(&mut self, outcome: UploadOutcome) -> bool {
        if self.status != UploadStatus::Pending {
            return false;
        }

        match outcome {
            UploadOutcome::Success { chunks_created } => {
                self.status = UploadStatus::Success;
                self.message = Some(format!("{chunks_created} chunk(s) created"));
                self.chunks_created = Some(chunks_created);
            }
            UploadOutcome::Failed { message } => {
                self.status = UploadStatus::Failed;
                self.message = Some(message);
            }
        }

        return true;
    }
}

/// Work handed to the upload worker: one selection of files, routed to the
/// workspace bound at submission time.
#[derive(Debug)]
pub struct UploadJob {
    pub workspace: WorkspaceId,
    pub files: Vec<FileHandle>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchSummary {
    pub workspace: WorkspaceId,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn to_message(&self) -> Message {
        let total = self.succeeded + self.failed;
        if self.failed == 0 {
            return Message::new_with_type(
                MessageType::Success,
                &format!(
                    "Uploaded {total} file(s) to workspace '{}'.",
                    self.workspace
                ),
            );
        }

        if self.succeeded == 0 {
            return Message::new_with_type(
                MessageType::Error,
                &format!("Failed to upload {} file(s).", self.failed),
            );
        }

        return Message::new_with_type(
            MessageType::Error,
            &format!(
                "{} succeeded, {} failed. Check each file below for details.",
                self.succeeded, self.failed
            ),
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileResultStatus {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResult {
    pub filename: Option<String>,
    pub status: FileResultStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks_created: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub total_chunks: u64,
    #[serde(default)]
    pub results: Vec<FileResult>,
}

impl UploadResponse {
    /// Resolves the outcome for one uploaded file. The server can reject a file
    /// inside an otherwise successful response, which counts as a failure.
    pub fn outcome_for(&self, filename: &str) -> UploadOutcome {
        let result = self
            .results
            .iter()
            .find(|e| return e.filename.as_deref() == Some(filename))
            .or_else(|| return self.results.first());

        let Some(result) = result else {
            return UploadOutcome::Success {
                chunks_created: self.total_chunks,
            };
        };

        match result.status {
            FileResultStatus::Success => {
                return UploadOutcome::Success {
                    chunks_created: result.chunks_created.unwrap_or(0),
                };
            }
            FileResultStatus::Error => {
                return UploadOutcome::Failed {
                    message: result
                        .message
                        .clone()
                        .unwrap_or_else(|| return "Unknown error".to_string()),
                };
            }
        }
    }
}
