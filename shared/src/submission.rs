use async_trait::async_trait;
use civic_atoms::reports::ReportPayload;
use report_block::{ReportSubmission, SubmissionError};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Prints each payload as one JSON line on stdout
#[derive(Debug, Default, Clone)]
pub struct StdoutSubmission;

#[async_trait]
impl ReportSubmission for StdoutSubmission {
    async fn submit(&self, payload: ReportPayload) -> Result<(), SubmissionError> {
        let line = encode_line(&payload)?;

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(line.as_bytes())
            .await
            .map_err(|e| SubmissionError(e.to_string()))?;
        stdout.flush().await.map_err(|e| SubmissionError(e.to_string()))
    }
}

/// Appends each payload as one JSON line to a file
#[derive(Debug, Clone)]
pub struct JsonFileSubmission {
    path: PathBuf,
}

impl JsonFileSubmission {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReportSubmission for JsonFileSubmission {
    async fn submit(&self, payload: ReportPayload) -> Result<(), SubmissionError> {
        let line = encode_line(&payload)?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| SubmissionError(format!("{}: {}", self.path.display(), e)))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| SubmissionError(format!("{}: {}", self.path.display(), e)))?;
        file.flush().await.map_err(|e| SubmissionError(e.to_string()))?;

        tracing::info!("📤 Report written to {}", self.path.display());
        Ok(())
    }
}

fn encode_line(payload: &ReportPayload) -> Result<String, SubmissionError> {
    let mut line = payload
        .to_json()
        .map_err(|e| SubmissionError(format!("could not encode payload: {}", e)))?;
    line.push('\n');
    Ok(line)
}
