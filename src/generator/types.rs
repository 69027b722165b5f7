use serde::{Deserialize, Serialize};

/// Arguments for a single generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Upper bound on new tokens generated after the prompt; the prompt
    /// itself does not count toward it.
    pub max_length: u32,
    pub num_sequences: u8,
}

/// One candidate produced by the model. `generated_text` starts with the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSequence {
    pub generated_text: String,
}

impl GeneratedSequence {
    pub fn new(generated_text: impl Into<String>) -> Self {
        Self {
            generated_text: generated_text.into(),
        }
    }
}
