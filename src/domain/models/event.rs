use super::BatchSummary;
use super::ClientError;
use super::FileHandle;
use super::QueryResult;
use super::UploadOutcome;

#[derive(Debug)]
pub enum Event {
    UploadResolved(FileHandle, UploadOutcome),
    UploadBatchFinished(BatchSummary),
    QueryResolved(u64, Result<QueryResult, ClientError>),
}
