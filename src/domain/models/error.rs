/// Failures surfaced at the upload and query boundaries. None of these are
/// fatal, each ends up as a message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// No workspace, or a blank one, is bound.
    #[error("No workspace is set. Set a workspace before uploading documents or asking questions.")]
    MissingWorkspace,

    /// The request could not complete.
    #[error("{0}")]
    TransportFailure(String),

    /// The request completed but the server reported a failure detail.
    #[error("{0}")]
    ServerReportedFailure(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> ClientError {
        return ClientError::TransportFailure(err.to_string());
    }
}
