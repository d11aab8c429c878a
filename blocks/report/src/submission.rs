use async_trait::async_trait;
use civic_atoms::reports::ReportPayload;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("submission failed: {0}")]
pub struct SubmissionError(pub String);

/// Receives finished payloads. Transport and response handling live behind it.
#[async_trait]
pub trait ReportSubmission: Send + Sync {
    async fn submit(&self, payload: ReportPayload) -> Result<(), SubmissionError>;
}
