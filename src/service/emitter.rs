use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// One output line: `{"result": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Success { result: String },
    Failure { error: String },
}

impl Response {
    pub fn success(result: impl Into<String>) -> Self {
        Self::Success {
            result: result.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<&Error> for Response {
    fn from(err: &Error) -> Self {
        Self::error(err.to_string())
    }
}

/// Writes responses as single JSON lines, flushing after each one.
pub struct ResponseEmitter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> ResponseEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn emit(&mut self, response: &Response) -> Result<()> {
        let mut line = serde_json::to_string(response)?;
        line.push('\n');

        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;

        Ok(())
    }
}
