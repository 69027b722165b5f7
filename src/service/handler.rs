use super::emitter::Response;
use super::parser::{Request, ValidatedPrompt};
use crate::{
    Result,
    generator::{GenerationRequest, TextGenerator},
};
use tracing::{debug, warn};

/// Maximum number of tokens generated after the prompt.
pub const MAX_LENGTH: u32 = 128;
/// Number of candidate sequences requested per prompt.
pub const NUM_SEQUENCES: u8 = 1;

pub struct GenerationHandler<'a> {
    generator: &'a dyn TextGenerator,
}

impl<'a> GenerationHandler<'a> {
    pub fn new(generator: &'a dyn TextGenerator) -> Self {
        Self { generator }
    }

    /// Validates the prompt and runs generation. Never fails: every outcome
    /// becomes a [`Response`].
    pub async fn handle(&self, request: &Request) -> Response {
        match self.generate(request).await {
            Ok(text) => Response::success(text),
            Err(e) => {
                warn!("Request failed: {}", e);
                Response::from(&e)
            }
        }
    }

    async fn generate(&self, request: &Request) -> Result<String> {
        let prompt = ValidatedPrompt::try_from(request)?;

        let sequences = self
            .generator
            .generate(GenerationRequest {
                prompt: prompt.into_inner(),
                max_length: MAX_LENGTH,
                num_sequences: NUM_SEQUENCES,
            })
            .await?;

        debug!("Generator returned {} sequences", sequences.len());

        Ok(sequences
            .into_iter()
            .next()
            .map(|sequence| sequence.generated_text)
            .unwrap_or_default())
    }
}
