#[cfg(test)]
#[path = "upload_worker_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::BackendBox;
use crate::domain::models::BatchSummary;
use crate::domain::models::Event;
use crate::domain::models::UploadJob;
use crate::domain::models::UploadOutcome;

/// Single consumer of the upload queue. Jobs are taken one at a time and files
/// within a job are uploaded in order, so there is never more than one upload
/// request in flight.
pub struct UploadWorker {}

impl UploadWorker {
    pub async fn start(
        backend: BackendBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<UploadJob>,
    ) -> Result<()> {
        while let Some(job) = rx.recv().await {
            let summary = UploadWorker::run(&backend, &tx, job).await?;
            tx.send(Event::UploadBatchFinished(summary))?;
        }

        return Ok(());
    }

    async fn run(
        backend: &BackendBox,
        tx: &mpsc::UnboundedSender<Event>,
        job: UploadJob,
    ) -> Result<BatchSummary> {
        let mut summary = BatchSummary {
            workspace: job.workspace.clone(),
            succeeded: 0,
            failed: 0,
        };

        for file in job.files {
            let outcome = match backend.upload(&file, &job.workspace).await {
                Ok(res) => res.outcome_for(&file.name),
                Err(err) => UploadOutcome::Failed {
                    message: err.to_string(),
                },
            };

            match &outcome {
                UploadOutcome::Success { chunks_created } => {
                    summary.succeeded += 1;
                    tracing::debug!(
                        filename = file.name,
                        chunks_created = chunks_created,
                        "Upload succeeded"
                    );
                }
                UploadOutcome::Failed { message } => {
                    summary.failed += 1;
                    tracing::warn!(filename = file.name, message = message, "Upload failed");
                }
            }

            tx.send(Event::UploadResolved(file, outcome))?;
        }

        return Ok(summary);
    }
}
