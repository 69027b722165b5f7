mod client;
mod types;

pub use client::{OpenAiGenerator, OpenAiLoader};
pub use types::*;

use crate::Result;
use async_trait::async_trait;

/// The model capability. Read-only once constructed; shared across requests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<Vec<GeneratedSequence>>;
}

/// One-time construction of a [`TextGenerator`].
///
/// Implementations report every failure as [`crate::Error::Load`].
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn initialize(&self) -> Result<Box<dyn TextGenerator>>;
}
