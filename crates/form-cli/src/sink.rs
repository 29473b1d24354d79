//! JSON submission sink

use async_trait::async_trait;
use form_engine::{FormsError, Submission, SubmissionSink};
use std::path::PathBuf;

/// Writes each accepted submission as pretty JSON to a file, or stdout
pub struct JsonSink {
    out: Option<PathBuf>,
}

impl JsonSink {
    pub fn new(out: Option<PathBuf>) -> Self {
        Self { out }
    }
}

#[async_trait]
impl SubmissionSink for JsonSink {
    async fn deliver(&self, submission: Submission) -> form_engine::Result<()> {
        let json = serde_json::to_string_pretty(&submission)?;
        match &self.out {
            Some(path) => tokio::fs::write(path, json)
                .await
                .map_err(|e| FormsError::Store(format!("{}: {}", path.display(), e))),
            None => {
                println!("{}", json);
                Ok(())
            }
        }
    }
}
