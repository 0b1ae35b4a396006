use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;

use super::UploadWorker;
use crate::domain::models::BackendBox;
use crate::domain::models::BatchSummary;
use crate::domain::models::ClientError;
use crate::domain::models::Event;
use crate::domain::models::SelectedFile;
use crate::domain::models::UploadJob;
use crate::domain::models::UploadOutcome;
use crate::domain::models::WorkspaceId;
use crate::infrastructure::backends::fake::FakeBackend;

fn to_resolved(event: Option<Event>) -> Result<(String, UploadOutcome)> {
    match event {
        Some(Event::UploadResolved(file, outcome)) => return Ok((file.name.to_string(), outcome)),
        _ => bail!("Expected an upload resolution"),
    }
}

fn to_summary(event: Option<Event>) -> Result<BatchSummary> {
    match event {
        Some(Event::UploadBatchFinished(summary)) => return Ok(summary),
        _ => bail!("Expected a batch summary"),
    }
}

#[tokio::test]
async fn it_uploads_jobs_sequentially() -> Result<()> {
    let fake = Arc::new(FakeBackend::default().with_upload_error(
        "b.pdf",
        ClientError::TransportFailure("connection reset".to_string()),
    ));
    let backend: BackendBox = fake.clone();

    let (job_tx, mut job_rx) = mpsc::unbounded_channel::<UploadJob>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let workspace = WorkspaceId::sanitize("acme");
    job_tx.send(UploadJob {
        workspace: workspace.clone(),
        files: vec![
            SelectedFile::new("a.pdf", b"aa".to_vec()),
            SelectedFile::new("b.pdf", b"bb".to_vec()),
        ],
    })?;
    job_tx.send(UploadJob {
        workspace: workspace.clone(),
        files: vec![SelectedFile::new("c.pdf", b"ccc".to_vec())],
    })?;
    drop(job_tx);

    UploadWorker::start(backend, event_tx, &mut job_rx).await?;

    assert_eq!(
        to_resolved(event_rx.recv().await)?,
        ("a.pdf".to_string(), UploadOutcome::Success { chunks_created: 2 })
    );
    assert_eq!(
        to_resolved(event_rx.recv().await)?,
        (
            "b.pdf".to_string(),
            UploadOutcome::Failed {
                message: "connection reset".to_string()
            }
        )
    );
    assert_eq!(
        to_summary(event_rx.recv().await)?,
        BatchSummary {
            workspace: workspace.clone(),
            succeeded: 1,
            failed: 1,
        }
    );
    assert_eq!(
        to_resolved(event_rx.recv().await)?,
        ("c.pdf".to_string(), UploadOutcome::Success { chunks_created: 3 })
    );
    assert_eq!(
        to_summary(event_rx.recv().await)?,
        BatchSummary {
            workspace,
            succeeded: 1,
            failed: 0,
        }
    );

    assert_eq!(fake.uploaded_files(), vec!["a.pdf", "b.pdf", "c.pdf"]);
    assert_eq!(fake.max_in_flight.load(Ordering::SeqCst), 1);

    return Ok(());
}

#[tokio::test]
async fn it_routes_uploads_to_the_job_workspace() -> Result<()> {
    let fake = Arc::new(FakeBackend::default());
    let backend: BackendBox = fake.clone();

    let (job_tx, mut job_rx) = mpsc::unbounded_channel::<UploadJob>();
    let (event_tx, _event_rx) = mpsc::unbounded_channel::<Event>();

    job_tx.send(UploadJob {
        workspace: WorkspaceId::sanitize("first"),
        files: vec![SelectedFile::new("a.pdf", vec![])],
    })?;
    job_tx.send(UploadJob {
        workspace: WorkspaceId::sanitize("second"),
        files: vec![SelectedFile::new("b.pdf", vec![])],
    })?;
    drop(job_tx);

    UploadWorker::start(backend, event_tx, &mut job_rx).await?;

    let uploads = fake.uploads.lock().unwrap().clone();
    assert_eq!(
        uploads,
        vec![
            ("a.pdf".to_string(), "first".to_string()),
            ("b.pdf".to_string(), "second".to_string()),
        ]
    );

    return Ok(());
}
