use crate::{Error, Result};
use serde_json::Value;

/// A decoded request line. `prompt` is already trimmed and may be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub prompt: String,
}

/// A prompt known to be non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPrompt(String);

impl ValidatedPrompt {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<&Request> for ValidatedPrompt {
    type Error = Error;

    fn try_from(request: &Request) -> Result<Self> {
        let prompt = request.prompt.trim();
        if prompt.is_empty() {
            return Err(Error::MissingPrompt);
        }
        Ok(Self(prompt.to_string()))
    }
}

/// Decodes one raw input line.
///
/// A missing or non-string `prompt` decodes to an empty prompt; only input
/// that is not a JSON object fails here.
pub fn parse(raw: &str) -> Result<Request> {
    let value: Value = serde_json::from_str(raw).map_err(|e| Error::parse(e.to_string()))?;

    let Value::Object(fields) = value else {
        return Err(Error::parse("Request must be a JSON object"));
    };

    let prompt = fields
        .get("prompt")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    Ok(Request { prompt })
}
