use super::{GeneratedSequence, GenerationRequest, ModelLoader, TextGenerator};
use crate::{Error, Result, config::GeneratorConfig};
use async_openai::{Client, config::OpenAIConfig, types as openai_types};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;
use tracing::debug;

/// Loads a model hosted behind an OpenAI-compatible completions API.
pub struct OpenAiLoader {
    config: GeneratorConfig,
}

impl OpenAiLoader {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ModelLoader for OpenAiLoader {
    async fn initialize(&self) -> Result<Box<dyn TextGenerator>> {
        let generator = OpenAiGenerator::new(self.config.clone());

        debug!("Checking that model {} is available", generator.model);

        // The models endpoint is the only way to learn the backend can serve
        // this model before the first request arrives.
        let model = generator
            .client
            .models()
            .retrieve(&generator.model)
            .await
            .map_err(|e| Error::load(e.to_string()))?;

        debug!("Model {} is served by {}", model.id, model.owned_by);

        Ok(Box::new(generator))
    }
}

pub struct OpenAiGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key);

        if !config.base_url.is_empty() {
            openai_config = openai_config.with_api_base(config.base_url);
        }

        // A failed call is reported once; never retry 429s or 5xx responses.
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        let client = Client::with_config(openai_config).with_backoff(no_retry);

        Self {
            client,
            model: config.model,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Vec<GeneratedSequence>> {
        debug!(
            "Creating completion: {} prompt chars, max_tokens={}, n={}",
            request.prompt.len(),
            request.max_length,
            request.num_sequences
        );

        let openai_request = openai_types::CreateCompletionRequestArgs::default()
            .model(&self.model)
            .prompt(request.prompt.clone())
            .max_tokens(request.max_length)
            .n(request.num_sequences)
            .build()
            .map_err(|e| Error::generation(e.to_string()))?;

        let response = self
            .client
            .completions()
            .create(openai_request)
            .await
            .map_err(|e| Error::generation(e.to_string()))?;

        debug!(
            "Received completion response with {} choices",
            response.choices.len()
        );

        let mut choices = response.choices;
        choices.sort_by_key(|choice| choice.index);

        // The completions API returns only the continuation.
        Ok(choices
            .into_iter()
            .map(|choice| GeneratedSequence::new(format!("{}{}", request.prompt, choice.text)))
            .collect())
    }
}
